use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::actions::Action;
use crate::config::{TerminalValue, ValueIterationConfig};
use crate::error::ConfigError;
use crate::gridworld::{GridWorld, State};
use crate::learning::policy::{PolicyEntry, PolicyTable};
use crate::learning::value_table::ValueTable;

/// Outcome of a value-iteration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub converged: bool,
    pub sweeps: usize,
    /// Largest per-cell change observed in each sweep.
    pub deltas: Vec<f64>,
}

impl SweepReport {
    pub fn final_delta(&self) -> Option<f64> {
        self.deltas.last().copied()
    }
}

/// Value iteration over a [`GridWorld`], holding its own value table.
#[derive(Debug, Clone)]
pub struct ValueIterationAgent<'a> {
    env: &'a GridWorld,
    gamma: f64,
    theta: f64,
    max_sweeps: usize,
    terminal_value: TerminalValue,
    values: ValueTable,
    report: Option<SweepReport>,
}

impl<'a> ValueIterationAgent<'a> {
    pub fn new(
        env: &'a GridWorld,
        config: &ValueIterationConfig,
        terminal_value: TerminalValue,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(ValueIterationAgent {
            env,
            gamma: config.gamma,
            theta: config.theta,
            max_sweeps: config.max_sweeps,
            terminal_value,
            values: ValueTable::zeros(env.size()),
            report: None,
        })
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Replace the value table, e.g. with the result of [`Self::next_table`].
    pub fn set_values(&mut self, values: ValueTable) {
        assert_eq!(values.size(), self.env.size(), "value table size mismatch");
        self.values = values;
    }

    /// Zero the value table and forget the last run.
    pub fn reset(&mut self) {
        self.values.fill(0.0);
        self.report = None;
    }

    /// Status of the most recent run, if any.
    pub fn report(&self) -> Option<&SweepReport> {
        self.report.as_ref()
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    fn terminal_value(&self) -> f64 {
        self.terminal_value.value(self.env)
    }

    /// One-step lookahead: the best action value at `state` under the
    /// current table and the action achieving it. Ties go to the earliest
    /// action in the fixed action order.
    pub fn lookahead(&self, state: State) -> (f64, Action) {
        let mut best = (f64::NEG_INFINITY, Action::Right);
        for action in Action::iter() {
            let t = self.env.step(state, action);
            let future = if t.done {
                0.0
            } else {
                self.gamma * self.values[t.next_state]
            };
            let q = t.reward + future;
            if q > best.0 {
                best = (q, action);
            }
        }
        best
    }

    /// Synchronous backup of every state, computed only from the current
    /// table. Does not modify the agent.
    pub fn next_table(&self) -> ValueTable {
        let mut next = ValueTable::zeros(self.env.size());
        for state in self.env.states() {
            next[state] = if self.env.is_terminal(state) {
                self.terminal_value()
            } else {
                self.lookahead(state).0
            };
        }
        next
    }

    /// In-place (Gauss-Seidel) sweep in raster order. Returns the largest
    /// absolute change made.
    pub fn sweep_inplace(&mut self) -> f64 {
        let mut delta: f64 = 0.0;
        for state in self.env.states() {
            let old = self.values[state];
            let new = if self.env.is_terminal(state) {
                self.terminal_value()
            } else {
                self.lookahead(state).0
            };
            self.values[state] = new;
            delta = delta.max((new - old).abs());
        }
        delta
    }

    /// Batch value iteration from the current table until the largest change
    /// in a sweep is at most theta, or the sweep cap is reached.
    pub fn run_batch(&mut self) -> SweepReport {
        let mut deltas = vec![];
        let mut converged = false;
        while deltas.len() < self.max_sweeps {
            let next = self.next_table();
            let delta = next.max_abs_diff(&self.values);
            self.set_values(next);
            deltas.push(delta);
            debug!("Batch sweep {:5}: delta = {:e}", deltas.len(), delta);
            if delta <= self.theta {
                converged = true;
                break;
            }
        }
        self.finish("batch", converged, deltas)
    }

    /// In-place value iteration from the current table.
    pub fn run_inplace(&mut self) -> SweepReport {
        let mut deltas = vec![];
        let mut converged = false;
        while deltas.len() < self.max_sweeps {
            let delta = self.sweep_inplace();
            deltas.push(delta);
            debug!("In-place sweep {:5}: delta = {:e}", deltas.len(), delta);
            if delta <= self.theta {
                converged = true;
                break;
            }
        }
        self.finish("in-place", converged, deltas)
    }

    fn finish(&mut self, kind: &str, converged: bool, deltas: Vec<f64>) -> SweepReport {
        let report = SweepReport {
            converged,
            sweeps: deltas.len(),
            deltas,
        };
        if converged {
            info!("{} value iteration converged after {} sweeps", kind, report.sweeps);
        } else {
            warn!(
                "{} value iteration stopped at the cap of {} sweeps (last delta {:?})",
                kind,
                self.max_sweeps,
                report.final_delta()
            );
        }
        self.report = Some(report.clone());
        report
    }

    /// Greedy policy with respect to the current table. The goal maps to
    /// [`PolicyEntry::Goal`] without a lookahead.
    pub fn greedy_policy(&self) -> PolicyTable {
        let mut policy = PolicyTable::new(self.env.size());
        for state in self.env.states() {
            let entry = if self.env.is_terminal(state) {
                PolicyEntry::Goal
            } else {
                PolicyEntry::Act(self.lookahead(state).1)
            };
            policy.set(state, entry);
        }
        policy
    }
}

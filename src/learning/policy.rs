use std::fmt;

use enum_dispatch::enum_dispatch;
use itertools::Itertools;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::gridworld::State;
use crate::learning::q_table::QTable;

/// One slot of a policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyEntry {
    Act(Action),
    /// The terminal state: no action is taken there.
    Goal,
}

impl PolicyEntry {
    pub fn action(self) -> Option<Action> {
        match self {
            PolicyEntry::Act(a) => Some(a),
            PolicyEntry::Goal => None,
        }
    }
}

/// Greedy policy derived from a value or action-value table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTable {
    size: usize,
    entries: Vec<PolicyEntry>,
}

impl PolicyTable {
    pub fn new(size: usize) -> Self {
        PolicyTable {
            size,
            entries: vec![PolicyEntry::Act(Action::Right); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, state: State) -> PolicyEntry {
        self.entries[state.row * self.size + state.col]
    }

    pub fn set(&mut self, state: State, entry: PolicyEntry) {
        self.entries[state.row * self.size + state.col] = entry;
    }

    pub fn entries(&self) -> &[PolicyEntry] {
        &self.entries
    }
}

impl fmt::Display for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.entries.chunks(self.size) {
            let line = row
                .iter()
                .map(|e| match e {
                    PolicyEntry::Act(a) => format!(" {} ", a.arrow()),
                    PolicyEntry::Goal => " G ".to_string(),
                })
                .join("");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Chooses the next action while rolling out an episode.
#[enum_dispatch]
pub trait SelectAction {
    fn select_action(&self, state: State, q: &QTable, rng: &mut StdRng) -> Action;
}

/// Deterministic policy: one fixed action per cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPolicy {
    size: usize,
    actions: Vec<Action>,
}

impl FixedPolicy {
    /// The same action everywhere, e.g. the "always Up" baseline.
    pub fn always(size: usize, action: Action) -> Self {
        FixedPolicy {
            size,
            actions: vec![action; size * size],
        }
    }

    pub fn action(&self, state: State) -> Action {
        self.actions[state.row * self.size + state.col]
    }
}

impl From<&PolicyTable> for FixedPolicy {
    fn from(table: &PolicyTable) -> Self {
        FixedPolicy {
            size: table.size(),
            // Rollouts stop on the goal, so its slot is never consulted.
            actions: table
                .entries()
                .iter()
                .map(|e| e.action().unwrap_or(Action::Right))
                .collect(),
        }
    }
}

impl SelectAction for FixedPolicy {
    fn select_action(&self, state: State, _q: &QTable, _rng: &mut StdRng) -> Action {
        self.action(state)
    }
}

/// Uniform random action with probability `epsilon`, otherwise greedy in Q.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    pub epsilon: f64,
}

impl SelectAction for EpsilonGreedy {
    fn select_action(&self, state: State, q: &QTable, rng: &mut StdRng) -> Action {
        if rng.random::<f64>() < self.epsilon {
            return Action::random(rng);
        }
        q.greedy(state).0
    }
}

/// Behaviour policy used to generate episodes.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(SelectAction)]
pub enum Behaviour {
    Fixed(FixedPolicy),
    EpsilonGreedy(EpsilonGreedy),
}

pub fn select_action(state: State, behaviour: &Behaviour, q: &QTable, rng: &mut StdRng) -> Action {
    behaviour.select_action(state, q, rng)
}

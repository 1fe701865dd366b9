use itertools::Itertools;
use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use strum::EnumCount;

use crate::actions::Action;
use crate::config::{MonteCarloConfig, TerminalValue};
use crate::error::ConfigError;
use crate::gridworld::{GridWorld, State};
use crate::learning::episode::{Episode, EpisodeStep};
use crate::learning::policy::{
    Behaviour, EpsilonGreedy, FixedPolicy, PolicyEntry, PolicyTable, select_action,
};
use crate::learning::q_table::QTable;
use crate::learning::returns::ReturnAccumulator;
use crate::learning::value_table::ValueTable;

const LOG_EVERY: usize = 10_000;

/// Operation counters for one prediction or control run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub episodes: usize,
    pub total_steps: usize,
    /// Episodes stopped by the step cap before reaching the goal.
    pub truncated: usize,
}

impl RunStats {
    pub fn avg_episode_len(&self) -> f64 {
        self.total_steps as f64 / self.episodes.max(1) as f64
    }

    fn record(&mut self, episode: &Episode) {
        self.episodes += 1;
        self.total_steps += episode.len();
        if episode.truncated {
            self.truncated += 1;
        }
    }
}

/// First-visit Monte Carlo prediction and epsilon-greedy control.
#[derive(Debug, Clone)]
pub struct MonteCarloAgent<'a> {
    env: &'a GridWorld,
    gamma: f64,
    epsilon: f64,
    max_steps: usize,
    terminal_value: TerminalValue,
    values: ValueTable,
    q: QTable,
    policy: PolicyTable,
    state_returns: ReturnAccumulator,
    action_returns: ReturnAccumulator,
    prediction_stats: RunStats,
    control_stats: RunStats,
}

impl<'a> MonteCarloAgent<'a> {
    pub fn new(
        env: &'a GridWorld,
        config: &MonteCarloConfig,
        terminal_value: TerminalValue,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = env.size();
        Ok(MonteCarloAgent {
            env,
            gamma: config.gamma,
            epsilon: config.epsilon,
            max_steps: config.max_steps,
            terminal_value,
            values: ValueTable::zeros(size),
            q: QTable::zeros(size),
            policy: PolicyTable::new(size),
            state_returns: ReturnAccumulator::new(env.n_states()),
            action_returns: ReturnAccumulator::new(env.n_states() * Action::COUNT),
            prediction_stats: RunStats::default(),
            control_stats: RunStats::default(),
        })
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn action_values(&self) -> &QTable {
        &self.q
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn prediction_stats(&self) -> RunStats {
        self.prediction_stats
    }

    pub fn control_stats(&self) -> RunStats {
        self.control_stats
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The epsilon-greedy behaviour over the agent's current Q table.
    pub fn epsilon_greedy(&self) -> Behaviour {
        Behaviour::EpsilonGreedy(EpsilonGreedy {
            epsilon: self.epsilon,
        })
    }

    fn random_start_state(&self, rng: &mut StdRng) -> State {
        let n = self.env.size();
        loop {
            let s = State::new(rng.random_range(0..n), rng.random_range(0..n));
            if !self.env.is_terminal(s) {
                return s;
            }
        }
    }

    /// Roll out one episode from a uniformly random non-terminal state,
    /// stopping at the goal or after `max_steps` steps.
    pub fn generate_episode(&self, behaviour: &Behaviour, rng: &mut StdRng) -> Episode {
        let mut state = self.random_start_state(rng);
        let mut episode = Episode {
            steps: Vec::with_capacity(self.max_steps.min(64)),
            truncated: true,
        };
        for _ in 0..self.max_steps {
            let action = select_action(state, behaviour, &self.q, rng);
            let t = self.env.step(state, action);
            episode.steps.push(EpisodeStep {
                state,
                action,
                reward: t.reward,
            });
            state = t.next_state;
            if t.done {
                episode.truncated = false;
                break;
            }
        }
        episode
    }

    /// Credit each state with the return from its first occurrence in
    /// `episode` and refresh its running-mean value.
    pub fn update_state_values(&mut self, episode: &Episode) {
        let returns = episode.returns(self.gamma);
        for (step, g) in episode
            .steps
            .iter()
            .zip(returns)
            .unique_by(|(step, _)| step.state)
        {
            let mean = self.state_returns.record(self.env.index(step.state), g);
            self.values[step.state] = mean;
        }
    }

    /// As [`Self::update_state_values`], at (state, action) granularity.
    pub fn update_action_values(&mut self, episode: &Episode) {
        let returns = episode.returns(self.gamma);
        for (step, g) in episode
            .steps
            .iter()
            .zip(returns)
            .unique_by(|(step, _)| (step.state, step.action))
        {
            let slot = self.env.index(step.state) * Action::COUNT + step.action.index();
            let mean = self.action_returns.record(slot, g);
            self.q.set(step.state, step.action, mean);
        }
    }

    /// Clear V and the state-return accumulators.
    pub fn reset_prediction(&mut self) {
        self.values.fill(0.0);
        self.state_returns.reset();
        self.prediction_stats = RunStats::default();
    }

    /// Clear Q, the policy and the state-action accumulators.
    pub fn reset_control(&mut self) {
        self.q.fill(0.0);
        self.policy = PolicyTable::new(self.env.size());
        self.action_returns.reset();
        self.control_stats = RunStats::default();
    }

    /// First-visit estimate of V for a fixed policy over `n_episodes`.
    pub fn predict(
        &mut self,
        policy: &FixedPolicy,
        n_episodes: usize,
        rng: &mut StdRng,
    ) -> &ValueTable {
        self.reset_prediction();
        let behaviour = Behaviour::Fixed(policy.clone());
        for i in 0..n_episodes {
            let episode = self.generate_episode(&behaviour, rng);
            self.prediction_stats.record(&episode);
            self.update_state_values(&episode);
            if (i + 1) % LOG_EVERY == 0 {
                debug!(
                    "Prediction: {} episodes, {} steps",
                    i + 1,
                    self.prediction_stats.total_steps
                );
            }
        }
        // Episodes stop on the goal, so it is never a first-visit target.
        self.values[self.env.terminal_state()] = self.terminal_value.value(self.env);
        self.log_run("prediction", self.prediction_stats);
        &self.values
    }

    /// On-policy first-visit control: every episode follows the
    /// epsilon-greedy behaviour over the Q table as it stands, then the
    /// greedy policy and V = max_a Q are extracted.
    pub fn control(&mut self, n_episodes: usize, rng: &mut StdRng) -> &PolicyTable {
        self.reset_control();
        let behaviour = self.epsilon_greedy();
        for i in 0..n_episodes {
            let episode = self.generate_episode(&behaviour, rng);
            self.control_stats.record(&episode);
            self.update_action_values(&episode);
            if (i + 1) % LOG_EVERY == 0 {
                debug!(
                    "Control: {} episodes, {} steps",
                    i + 1,
                    self.control_stats.total_steps
                );
            }
        }
        self.extract_greedy_policy();
        self.log_run("control", self.control_stats);
        &self.policy
    }

    /// Greedy policy and V = max_a Q from the current Q table.
    pub fn extract_greedy_policy(&mut self) {
        for state in self.env.states() {
            if self.env.is_terminal(state) {
                self.policy.set(state, PolicyEntry::Goal);
                self.values[state] = self.terminal_value.value(self.env);
            } else {
                let (action, value) = self.q.greedy(state);
                self.policy.set(state, PolicyEntry::Act(action));
                self.values[state] = value;
            }
        }
    }

    fn log_run(&self, kind: &str, stats: RunStats) {
        info!(
            "MC {}: {} episodes, {} steps, avg length {:.2}",
            kind,
            stats.episodes,
            stats.total_steps,
            stats.avg_episode_len()
        );
        if stats.truncated > 0 {
            warn!(
                "MC {}: {} episodes hit the cap of {} steps",
                kind, stats.truncated, self.max_steps
            );
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::gridworld::State;

/// One (state, action, reward) triple; the reward is the one earned on
/// landing after taking `action` in `state`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStep {
    pub state: State,
    pub action: Action,
    pub reward: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub steps: Vec<EpisodeStep>,
    /// True if the rollout hit the step cap before reaching the goal.
    pub truncated: bool,
}

impl Episode {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discounted return G_t for every time step, computed backwards with
    /// G_t = r_t + gamma * G_{t+1}.
    pub fn returns(&self, gamma: f64) -> Vec<f64> {
        let mut g = 0.0;
        let mut returns = vec![0.0; self.steps.len()];
        for (t, step) in self.steps.iter().enumerate().rev() {
            g = step.reward + gamma * g;
            returns[t] = g;
        }
        returns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn step(row: usize, col: usize, action: Action, reward: f64) -> EpisodeStep {
        EpisodeStep {
            state: State::new(row, col),
            action,
            reward,
        }
    }

    #[test]
    fn test_returns_backward_accumulation() {
        let ep = Episode {
            steps: vec![
                step(0, 0, Action::Right, -1.0),
                step(0, 1, Action::Down, -5.0),
                step(1, 1, Action::Down, 10.0),
            ],
            truncated: false,
        };
        let g = ep.returns(0.9);
        assert_float_eq!(g[2], 10.0, abs <= 1e-12);
        assert_float_eq!(g[1], -5.0 + 9.0, abs <= 1e-12);
        assert_float_eq!(g[0], -1.0 + 0.9 * 4.0, abs <= 1e-12);
    }

    #[test]
    fn test_empty_episode() {
        let ep = Episode::default();
        assert!(ep.is_empty());
        assert!(ep.returns(0.9).is_empty());
    }
}

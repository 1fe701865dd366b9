pub mod actions;
pub mod config;
pub mod error;
pub mod gridworld;
pub mod learning;
pub mod value_iteration;

/// Reward for landing on an ordinary tile.
pub const COST_OF_LIVING: f64 = -1.0;
/// Reward for landing on a grey (penalty) tile.
pub const PENALTY_REWARD: f64 = -5.0;
/// Reward for landing on the goal.
pub const GOAL_REWARD: f64 = 10.0;

pub const DEFAULT_GRID_SIZE: usize = 5;
pub const PENALTY_STATES: [(usize, usize); 3] = [(0, 4), (2, 2), (3, 0)];

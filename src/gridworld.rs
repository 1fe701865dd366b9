use std::fmt;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::GridError;
use crate::{COST_OF_LIVING, DEFAULT_GRID_SIZE, GOAL_REWARD, PENALTY_REWARD, PENALTY_STATES};

/// A grid coordinate. The only state representation in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub row: usize,
    pub col: usize,
}

impl State {
    pub fn new(row: usize, col: usize) -> Self {
        State { row, col }
    }
}

impl From<(usize, usize)> for State {
    fn from((row, col): (usize, usize)) -> Self {
        State { row, col }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Outcome of a single environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: State,
    pub reward: f64,
    pub done: bool,
}

/// Deterministic N x N grid with rewards earned on the landing tile.
///
/// The goal sits in the bottom-right corner and absorbs every action.
/// Moving off the grid leaves the agent in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorld {
    size: usize,
    terminal: State,
    penalty_states: Vec<State>,
    rewards: Vec<f64>,
}

impl Default for GridWorld {
    fn default() -> Self {
        GridWorld::build(DEFAULT_GRID_SIZE)
    }
}

impl GridWorld {
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size < 2 {
            return Err(GridError::GridTooSmall(size));
        }
        Ok(GridWorld::build(size))
    }

    fn build(size: usize) -> Self {
        let terminal = State::new(size - 1, size - 1);
        let penalty_states: Vec<State> = PENALTY_STATES
            .iter()
            .map(|&coord| State::from(coord))
            .filter(|s| s.row < size && s.col < size && *s != terminal)
            .collect();

        let mut rewards = vec![COST_OF_LIVING; size * size];
        for s in &penalty_states {
            rewards[s.row * size + s.col] = PENALTY_REWARD;
        }
        rewards[terminal.row * size + terminal.col] = GOAL_REWARD;

        GridWorld {
            size,
            terminal,
            penalty_states,
            rewards,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn n_states(&self) -> usize {
        self.size * self.size
    }

    pub fn terminal_state(&self) -> State {
        self.terminal
    }

    pub fn penalty_states(&self) -> &[State] {
        &self.penalty_states
    }

    pub fn is_terminal(&self, state: State) -> bool {
        state == self.terminal
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// Validated constructor for a coordinate on this grid.
    pub fn state(&self, row: usize, col: usize) -> Result<State, GridError> {
        if !self.contains(row, col) {
            return Err(GridError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(State::new(row, col))
    }

    /// Flat raster index of a state, used to address the tables.
    pub fn index(&self, state: State) -> usize {
        state.row * self.size + state.col
    }

    /// Reward for landing on `state`.
    pub fn reward(&self, state: State) -> f64 {
        self.rewards[self.index(state)]
    }

    pub fn goal_reward(&self) -> f64 {
        self.reward(self.terminal)
    }

    /// All states in raster order (row by row).
    pub fn states(&self) -> impl Iterator<Item = State> + use<> {
        iproduct!(0..self.size, 0..self.size).map(State::from)
    }

    pub fn non_terminal_states(&self) -> impl Iterator<Item = State> + '_ {
        self.states().filter(move |s| !self.is_terminal(*s))
    }

    /// Take `action` from `state`.
    ///
    /// # Panics
    /// Panics if `state` lies outside the grid.
    pub fn step(&self, state: State, action: Action) -> Transition {
        assert!(
            self.contains(state.row, state.col),
            "{}",
            GridError::OutOfBounds {
                row: state.row,
                col: state.col,
                size: self.size,
            }
        );

        if self.is_terminal(state) {
            return Transition {
                next_state: state,
                reward: self.reward(state),
                done: true,
            };
        }

        let (dr, dc) = action.delta();
        let next_state = match (
            state.row.checked_add_signed(dr),
            state.col.checked_add_signed(dc),
        ) {
            (Some(row), Some(col)) if self.contains(row, col) => State::new(row, col),
            // Bumped into a wall.
            _ => state,
        };

        Transition {
            next_state,
            reward: self.reward(next_state),
            done: self.is_terminal(next_state),
        }
    }
}

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::actions::Action;
use crate::gridworld::State;

/// Action-value table Q, one row of action values per grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    size: usize,
    tab: Vec<[f64; Action::COUNT]>,
}

impl QTable {
    pub fn zeros(size: usize) -> Self {
        QTable {
            size,
            tab: vec![[0.0; Action::COUNT]; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, state: State, action: Action) -> f64 {
        self.row(state)[action.index()]
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        let idx = state.row * self.size + state.col;
        self.tab[idx][action.index()] = value;
    }

    /// Action values of `state` in action order.
    pub fn row(&self, state: State) -> &[f64; Action::COUNT] {
        &self.tab[state.row * self.size + state.col]
    }

    /// Best action and its value. Ties go to the earliest action.
    pub fn greedy(&self, state: State) -> (Action, f64) {
        let row = self.row(state);
        let mut best = (Action::Right, row[0]);
        for a in Action::iter().skip(1) {
            if row[a.index()] > best.1 {
                best = (a, row[a.index()]);
            }
        }
        best
    }

    pub fn fill(&mut self, value: f64) {
        for row in self.tab.iter_mut() {
            *row = [value; Action::COUNT];
        }
    }
}

use std::fmt;
use std::ops::{Index, IndexMut};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::gridworld::State;

/// State-value table V over an N x N grid, stored in raster order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    size: usize,
    values: Vec<f64>,
}

impl ValueTable {
    pub fn zeros(size: usize) -> Self {
        ValueTable {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build a table from row-major values.
    ///
    /// # Panics
    /// Panics if `values` does not hold `size * size` entries.
    pub fn from_rows(size: usize, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), size * size, "value table must be square");
        ValueTable { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// Largest absolute per-cell difference to `other`.
    pub fn max_abs_diff(&self, other: &ValueTable) -> f64 {
        self.values
            .iter()
            .zip_eq(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Mean absolute per-cell difference to `other`.
    pub fn mean_abs_diff(&self, other: &ValueTable) -> f64 {
        let total: f64 = self
            .values
            .iter()
            .zip_eq(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        total / self.values.len() as f64
    }
}

impl Index<State> for ValueTable {
    type Output = f64;

    fn index(&self, state: State) -> &f64 {
        &self.values[state.row * self.size + state.col]
    }
}

impl IndexMut<State> for ValueTable {
    fn index_mut(&mut self, state: State) -> &mut f64 {
        &mut self.values[state.row * self.size + state.col]
    }
}

impl fmt::Display for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values.chunks(self.size) {
            writeln!(f, "{}", row.iter().map(|v| format!("{v:6.2}")).join(" "))?;
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

/// Running sum and count of sampled returns per table slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnAccumulator {
    sum: Vec<f64>,
    count: Vec<u64>,
}

impl ReturnAccumulator {
    pub fn new(n_slots: usize) -> Self {
        ReturnAccumulator {
            sum: vec![0.0; n_slots],
            count: vec![0; n_slots],
        }
    }

    /// Add one sample for `slot` and return the updated mean.
    pub fn record(&mut self, slot: usize, g: f64) -> f64 {
        self.sum[slot] += g;
        self.count[slot] += 1;
        self.sum[slot] / self.count[slot] as f64
    }

    pub fn count(&self, slot: usize) -> u64 {
        self.count[slot]
    }

    pub fn mean(&self, slot: usize) -> Option<f64> {
        match self.count[slot] {
            0 => None,
            n => Some(self.sum[slot] / n as f64),
        }
    }

    pub fn reset(&mut self) {
        self.sum.fill(0.0);
        self.count.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean() {
        let mut acc = ReturnAccumulator::new(3);
        assert_eq!(acc.mean(1), None);
        assert_eq!(acc.record(1, 2.0), 2.0);
        assert_eq!(acc.record(1, 4.0), 3.0);
        assert_eq!(acc.count(1), 2);
        assert_eq!(acc.count(0), 0);
        acc.reset();
        assert_eq!(acc.mean(1), None);
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

use crate::error::GridError;

/// The four directional moves. The declaration order fixes the action
/// indices used by every table in the crate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCountMacro,
    Display,
)]
pub enum Action {
    Right,
    Left,
    Down,
    Up,
}

impl Action {
    /// Position of the action in the fixed action order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Row and column offset applied by the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Right => (0, 1),
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Up => (-1, 0),
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Action::Right => '→',
            Action::Left => '←',
            Action::Down => '↓',
            Action::Up => '↑',
        }
    }

    /// Uniformly random action.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..Action::COUNT) {
            0 => Action::Right,
            1 => Action::Left,
            2 => Action::Down,
            3 => Action::Up,
            _ => unreachable!(),
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = GridError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::iter()
            .nth(index)
            .ok_or(GridError::InvalidAction(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_index_round_trip_is_stable() {
        for (i, action) in Action::iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::try_from(i), Ok(action));
        }
        assert_eq!(Action::COUNT, 4);
    }

    #[test]
    fn test_invalid_index_rejected() {
        assert_eq!(Action::try_from(4), Err(GridError::InvalidAction(4)));
    }

    #[test]
    fn test_random_covers_all_actions() {
        let rng = &mut StdRng::seed_from_u64(7);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[Action::random(rng).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}

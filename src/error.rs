use thiserror::Error;

/// Contract violations against the grid model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid action index: {0}")]
    InvalidAction(usize),

    #[error("State ({row}, {col}) lies outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("Grid size must be at least 2, got {0}")]
    GridTooSmall(usize),
}

/// Errors raised while loading or validating a [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Discount factor must lie in (0, 1], got {0}")]
    InvalidGamma(f64),

    #[error("Convergence threshold must be positive, got {0}")]
    InvalidTheta(f64),

    #[error("Exploration rate must lie in [0, 1], got {0}")]
    InvalidEpsilon(f64),

    #[error("Episode step cap must be positive")]
    InvalidMaxSteps,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_action_display() {
        let e = GridError::InvalidAction(7);
        assert_eq!(e.to_string(), "Invalid action index: 7");
    }

    #[test]
    fn out_of_bounds_display() {
        let e = GridError::OutOfBounds {
            row: 5,
            col: 0,
            size: 5,
        };
        assert_eq!(e.to_string(), "State (5, 0) lies outside the 5x5 grid");
    }

    #[test]
    fn grid_error_wraps_transparently() {
        let e: ConfigError = GridError::GridTooSmall(1).into();
        assert_eq!(e.to_string(), "Grid size must be at least 2, got 1");
    }

    #[test]
    fn gamma_display() {
        let e = ConfigError::InvalidGamma(1.5);
        assert!(e.to_string().contains("Discount factor"));
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_GRID_SIZE;
use crate::error::{ConfigError, GridError};
use crate::gridworld::GridWorld;

/// What V(terminal) holds in every value table the solvers produce.
///
/// Lookahead never reads it (no future term after `done`), so the choice
/// only matters for reporting and for comparing tables across methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalValue {
    /// Rewards are earned on transition; the goal holds no resting value.
    #[default]
    Zero,
    /// The goal holds its own landing reward.
    Reward,
}

impl TerminalValue {
    pub fn value(self, env: &GridWorld) -> f64 {
        match self {
            TerminalValue::Zero => 0.0,
            TerminalValue::Reward => env.goal_reward(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: usize,
    #[serde(default)]
    pub terminal_value: TerminalValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueIterationConfig {
    pub gamma: f64,
    pub theta: f64,
    pub max_sweeps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub gamma: f64,
    pub epsilon: f64,
    pub max_steps: usize,
    pub prediction_episodes: usize,
    pub control_episodes: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    pub value_iteration: ValueIterationConfig,
    pub monte_carlo: MonteCarloConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            size: DEFAULT_GRID_SIZE,
            terminal_value: TerminalValue::Zero,
        }
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        ValueIterationConfig {
            gamma: 0.9,
            theta: 1e-9,
            max_sweeps: 10_000,
        }
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            gamma: 0.9,
            epsilon: 0.1,
            max_steps: 200,
            prediction_episodes: 5_000,
            control_episodes: 30_000,
            seed: 42,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid: GridConfig::default(),
            value_iteration: ValueIterationConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

pub(crate) fn check_gamma(gamma: f64) -> Result<(), ConfigError> {
    if gamma > 0.0 && gamma <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidGamma(gamma))
    }
}

impl ValueIterationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gamma(self.gamma)?;
        if !(self.theta > 0.0) {
            return Err(ConfigError::InvalidTheta(self.theta));
        }
        Ok(())
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gamma(self.gamma)?;
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps);
        }
        Ok(())
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Config::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.size < 2 {
            return Err(GridError::GridTooSmall(self.grid.size).into());
        }
        self.value_iteration.validate()?;
        self.monte_carlo.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("[grid]\nsize = 5\nterminal_value = \"zero\"\n"));

        let deserialized = Config::from_toml_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_read_from_file() {
        let config = Config::from_file("./gridworld.toml").expect("Failed to read the file");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_terminal_value_defaults_to_zero() {
        let s = r#"
            [grid]
            size = 4

            [value_iteration]
            gamma = 0.95
            theta = 1e-6
            max_sweeps = 100

            [monte_carlo]
            gamma = 0.95
            epsilon = 0.2
            max_steps = 50
            prediction_episodes = 10
            control_episodes = 10
            seed = 1
        "#;
        let config = Config::from_toml_str(s).unwrap();
        assert_eq!(config.grid.terminal_value, TerminalValue::Zero);
        assert_eq!(config.grid.size, 4);
    }

    #[test]
    fn test_terminal_value_convention() {
        let env = GridWorld::default();
        assert_eq!(TerminalValue::Zero.value(&env), 0.0);
        assert_eq!(TerminalValue::Reward.value(&env), 10.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.value_iteration.gamma = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGamma(_))));

        let mut config = Config::default();
        config.value_iteration.theta = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTheta(_))));

        let mut config = Config::default();
        config.monte_carlo.epsilon = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidEpsilon(_))));

        let mut config = Config::default();
        config.monte_carlo.max_steps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxSteps)));

        let mut config = Config::default();
        config.grid.size = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Grid(_))));
    }

    #[test]
    fn test_parse_error_surfaces() {
        assert!(matches!(
            Config::from_toml_str("grid = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}

//! Configuration of the engine.
//!
//! Every field has a default, so an empty TOML document is a valid configuration.

use crate::scoring::ScoringPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Largest accepted value of `algebra.max_variables`
pub const MAX_VARIABLES_LIMIT: usize = 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Limits of the boolean simplifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgebraConfig {
    /// Expressions with more distinct variables are rejected instead of simplified
    #[serde(default = "default_max_variables")]
    pub max_variables: usize,
}

fn default_max_variables() -> usize {
    8
}

impl Default for AlgebraConfig {
    fn default() -> Self {
        Self {
            max_variables: default_max_variables(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringPolicy,

    #[serde(default)]
    pub algebra: AlgebraConfig,
}

impl Config {
    /// Parses and validates a TOML document.
    ///
    /// ```
    /// use mantiq::Config;
    ///
    /// let config = Config::from_toml_str("[scoring]\nbase_points = 20").unwrap();
    /// assert_eq!(config.scoring.base_points, 20);
    /// assert_eq!(config.scoring.bonus_per_tier, 2);
    /// assert_eq!(config.algebra.max_variables, 8);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.algebra.max_variables;
        if max == 0 || max > MAX_VARIABLES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "algebra.max_variables must be between 1 and {}, got {}",
                MAX_VARIABLES_LIMIT, max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scoring.base_points, 10);
        assert!(config.scoring.bonus_on_incorrect);
    }

    #[test]
    fn partial_sections() {
        let toml_str = r#"
[scoring]
bonus_on_incorrect = false

[algebra]
max_variables = 4
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert!(!config.scoring.bonus_on_incorrect);
        assert_eq!(config.scoring.bonus_per_tier, 2);
        assert_eq!(config.algebra.max_variables, 4);
    }

    #[test]
    fn rejects_out_of_range_limits() {
        for n in [0, 17] {
            let toml_str = format!("[algebra]\nmax_variables = {}", n);
            assert!(matches!(
                Config::from_toml_str(&toml_str),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Config::from_toml_str("[scoring"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/mantiq.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn serializes_back() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}

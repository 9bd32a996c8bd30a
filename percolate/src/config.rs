use crate::error::{check_probability, ClusterError};
use crate::lattice::Lattice;

/// Parameters of one percolation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PercolationConfig {
    /// Lattice side length L.
    pub side: usize,
    /// Probability that each bond is open.
    pub probability: f64,
    /// Seed for the bond stream; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for PercolationConfig {
    fn default() -> Self {
        Self {
            side: 300,
            probability: 0.5,
            seed: None,
        }
    }
}

impl PercolationConfig {
    /// Check the side length and probability without running anything.
    pub fn validate(&self) -> Result<(), ClusterError> {
        Lattice::new(self.side)?;
        check_probability(self.probability)?;
        Ok(())
    }

    /// Parse a config from TOML. Missing keys take their default values.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Invalid(#[from] ClusterError),
}

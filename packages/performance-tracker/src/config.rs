//! Tracker configuration.
//!
//! Loaded from a TOML file so the same risk-free rate, VaR tail and sampling
//! period can be reused across runs. Every field has a default, so an absent
//! file or a partial file is fine.

use crate::types::Period;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Scalar parameters shared by every metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Annual risk-free rate, in the same percent units as annualized returns
    pub annual_risk_free: f64,
    /// Tail probability for value-at-risk (0.05 = 95% confidence)
    pub alpha_var: f64,
    /// Sampling period of the return series
    pub period: Period,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            annual_risk_free: 0.0,
            alpha_var: 0.05,
            period: Period::Daily,
        }
    }
}

impl TrackerConfig {
    /// Create a configuration for the given period with default rates.
    pub fn new(period: Period) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    pub fn with_risk_free(mut self, annual_risk_free: f64) -> Self {
        self.annual_risk_free = annual_risk_free;
        self
    }

    pub fn with_alpha_var(mut self, alpha_var: f64) -> Self {
        self.alpha_var = alpha_var;
        self
    }

    /// Confidence level in whole percent, as used in metric names.
    ///
    /// Halves round to even, so a 1.5% tail reads as 98.
    pub fn confidence_pct(&self) -> i64 {
        (100.0 * (1.0 - self.alpha_var)).round_ties_even() as i64
    }

    /// Check that the parameters describe a usable configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha_var > 0.0 && self.alpha_var < 1.0) {
            return Err(Error::Configuration(format!(
                "alpha_var must lie strictly between 0 and 1, got {}",
                self.alpha_var
            )));
        }
        if !self.annual_risk_free.is_finite() {
            return Err(Error::Configuration(
                "annual_risk_free must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// Default path: `<config dir>/perftrack/config.toml`
    /// Can be overridden with `PERFTRACK_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("PERFTRACK_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("perftrack/config.toml"))
            .unwrap_or_else(|| PathBuf::from("perftrack.toml"))
    }

    /// Load the configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load a configuration file, falling back to defaults if it is missing.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("Failed to encode config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}

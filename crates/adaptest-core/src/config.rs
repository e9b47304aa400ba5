//! adaptest configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::SessionConfig;
use crate::estimation::EstimatorOptions;
use crate::input::RetryPolicy;

/// Top-level adaptest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptestConfig {
    /// Items administered before a session is complete.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Ability estimate before any response.
    #[serde(default)]
    pub initial_theta: f64,
    /// Lower bound of the ability range.
    #[serde(default = "default_theta_min")]
    pub theta_min: f64,
    /// Upper bound of the ability range.
    #[serde(default = "default_theta_max")]
    pub theta_max: f64,
    /// Absolute tolerance of the ability search.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Evaluation budget of the ability search.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: u32,
    /// Attempts allowed per item before giving up (unlimited when absent).
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Item bank file (the bundled bank when absent).
    #[serde(default)]
    pub item_bank: Option<PathBuf>,
}

fn default_max_items() -> usize {
    5
}
fn default_theta_min() -> f64 {
    -4.0
}
fn default_theta_max() -> f64 {
    4.0
}
fn default_tolerance() -> f64 {
    1e-5
}
fn default_max_evaluations() -> u32 {
    500
}

impl Default for AdaptestConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            initial_theta: 0.0,
            theta_min: default_theta_min(),
            theta_max: default_theta_max(),
            tolerance: default_tolerance(),
            max_evaluations: default_max_evaluations(),
            max_attempts: None,
            item_bank: None,
        }
    }
}

impl AdaptestConfig {
    /// Check that the values describe a usable session.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_items >= 1, "max_items must be at least 1");
        anyhow::ensure!(
            self.theta_min.is_finite() && self.theta_max.is_finite(),
            "theta bounds must be finite"
        );
        anyhow::ensure!(
            self.theta_min < self.theta_max,
            "theta_min ({}) must be below theta_max ({})",
            self.theta_min,
            self.theta_max
        );
        anyhow::ensure!(
            (self.theta_min..=self.theta_max).contains(&self.initial_theta),
            "initial_theta ({}) must lie within [{}, {}]",
            self.initial_theta,
            self.theta_min,
            self.theta_max
        );
        anyhow::ensure!(
            self.tolerance.is_finite() && self.tolerance > 0.0,
            "tolerance must be positive"
        );
        anyhow::ensure!(
            self.max_evaluations >= 1,
            "max_evaluations must be at least 1"
        );
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_items: self.max_items,
            estimator: EstimatorOptions {
                lower: self.theta_min,
                upper: self.theta_max,
                initial_theta: self.initial_theta,
                tolerance: self.tolerance,
                max_evaluations: self.max_evaluations,
            },
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_max_attempts(self.max_attempts)
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without an explicit path:
/// 1. `adaptest.toml` in the current directory
/// 2. `~/.config/adaptest/config.toml`
///
/// Environment variable overrides: `ADAPTEST_MAX_ITEMS`, `ADAPTEST_ITEM_BANK`.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptest.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => AdaptestConfig::default(),
    };

    // Apply env var overrides
    if let Ok(value) = std::env::var("ADAPTEST_MAX_ITEMS") {
        config.max_items = value
            .trim()
            .parse()
            .with_context(|| format!("invalid ADAPTEST_MAX_ITEMS: '{value}'"))?;
    }
    if let Ok(value) = std::env::var("ADAPTEST_ITEM_BANK") {
        config.item_bank = Some(PathBuf::from(value));
    }

    config.validate()?;
    Ok(config)
}

/// Parse a config file's contents.
pub fn parse_config_str(content: &str) -> Result<AdaptestConfig> {
    toml::from_str(content).context("invalid adaptest config")
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptest"))
}

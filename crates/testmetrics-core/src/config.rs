//! Configuration loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MarkingError;
use crate::model::MarkingScheme;

/// Environment variable overriding `positive_mark`.
pub const POSITIVE_MARK_ENV: &str = "TESTMETRICS_POSITIVE_MARK";
/// Environment variable overriding `negative_mark`.
pub const NEGATIVE_MARK_ENV: &str = "TESTMETRICS_NEGATIVE_MARK";

/// Format of the augmented table written by `compute`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Top-level testmetrics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Credit per correct answer.
    #[serde(default = "default_positive_mark")]
    pub positive_mark: f64,
    /// Penalty per wrong answer, as a non-negative magnitude.
    #[serde(default = "default_negative_mark")]
    pub negative_mark: f64,
    /// Default output format for `compute`.
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_positive_mark() -> f64 {
    MarkingScheme::DEFAULT_POSITIVE_MARK
}
fn default_negative_mark() -> f64 {
    MarkingScheme::DEFAULT_NEGATIVE_MARK
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            positive_mark: default_positive_mark(),
            negative_mark: default_negative_mark(),
            output_format: OutputFormat::default(),
        }
    }
}

impl MetricsConfig {
    /// Validate the configured marks into a scheme.
    pub fn marking_scheme(&self) -> Result<MarkingScheme, MarkingError> {
        MarkingScheme::new(self.positive_mark, self.negative_mark)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config TOML")
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `testmetrics.toml` in the current directory
/// 2. `~/.config/testmetrics/config.toml`
///
/// Environment variable overrides: `TESTMETRICS_POSITIVE_MARK`,
/// `TESTMETRICS_NEGATIVE_MARK`.
pub fn load_config() -> Result<MetricsConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MetricsConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("testmetrics.toml");
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
            tracing::debug!(path = %path.display(), "loading config");
            MetricsConfig::from_toml_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MetricsConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Apply mark overrides from `lookup` (the process environment in practice).
fn apply_overrides<F>(config: &mut MetricsConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let parse = |name: &str| -> Result<Option<f64>> {
        lookup(name)
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .with_context(|| format!("invalid {name}: '{raw}'"))
            })
            .transpose()
    };

    if let Some(v) = parse(POSITIVE_MARK_ENV)? {
        config.positive_mark = v;
    }
    if let Some(v) = parse(NEGATIVE_MARK_ENV)? {
        config.negative_mark = v;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("testmetrics"))
}

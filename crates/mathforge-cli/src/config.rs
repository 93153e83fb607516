//! CLI configuration.
//!
//! Settings come from an optional `mathforge.toml`; command-line flags
//! override file values, and everything has a sensible default.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mathforge_core::model::Difficulty;

/// Which adaptation policy drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Deterministic threshold policy.
    Rules,
    /// Pretrained softmax classifier with rule fallback.
    Model,
}

impl FromStr for PolicyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rules" | "rule" | "rule-based" => Ok(PolicyKind::Rules),
            "model" | "classifier" | "ml" => Ok(PolicyKind::Model),
            other => anyhow::bail!("unknown policy kind: {other}"),
        }
    }
}

/// Top-level mathforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathforgeConfig {
    /// Problems per session.
    #[serde(default = "default_problems")]
    pub problems: usize,
    /// Window size for rolling statistics.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Adaptation policy to use.
    #[serde(default = "default_policy")]
    pub policy: PolicyKind,
    /// Starting difficulty tier.
    #[serde(default = "default_difficulty")]
    pub start_difficulty: Difficulty,
    /// RNG seed for reproducible sessions (unset = OS entropy).
    #[serde(default)]
    pub seed: Option<u64>,
    /// Directory for saved session reports.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_problems() -> usize {
    10
}

fn default_window() -> usize {
    3
}

fn default_policy() -> PolicyKind {
    PolicyKind::Rules
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("./mathforge-reports")
}

impl Default for MathforgeConfig {
    fn default() -> Self {
        Self {
            problems: default_problems(),
            window: default_window(),
            policy: default_policy(),
            start_difficulty: default_difficulty(),
            seed: None,
            report_dir: default_report_dir(),
        }
    }
}

/// Load configuration from an explicit path, from `./mathforge.toml` if it
/// exists, or fall back to defaults.
pub fn load_config_from(path: Option<&Path>) -> Result<MathforgeConfig> {
    let candidate = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let default = PathBuf::from("mathforge.toml");
            default.exists().then_some(default)
        }
    };

    match candidate {
        Some(p) => {
            let content = std::fs::read_to_string(&p)
                .with_context(|| format!("failed to read config from {}", p.display()))?;
            let config: MathforgeConfig =
                toml::from_str(&content).context("failed to parse config TOML")?;
            anyhow::ensure!(config.problems >= 1, "problems must be at least 1");
            anyhow::ensure!(config.window >= 1, "window must be at least 1");
            Ok(config)
        }
        None => Ok(MathforgeConfig::default()),
    }
}

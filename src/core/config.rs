use crate::errors::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the directory screenshots are written to.
pub const OUTPUT_DIR_ENV: &str = "SCOUT_OUTPUT_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    pub browser: BrowserConfig,
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Bounds for the randomized pause between scripted actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            args: vec![],
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_ms: 500,
            max_ms: 1500,
        }
    }
}

/// Read the screenshot directory from the environment, failing fast when the
/// variable is unset or empty.
pub fn output_dir_from_env() -> Result<PathBuf> {
    output_dir_from(OUTPUT_DIR_ENV)
}

fn output_dir_from(var: &str) -> Result<PathBuf> {
    match std::env::var(var) {
        Ok(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => Err(ScoutError::Configuration(format!(
            "{} environment variable not set",
            var
        ))),
    }
}

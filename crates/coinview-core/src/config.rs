use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PRIVACY_LEVEL_STRONG, DEFAULT_RESET_THRESHOLD, STATUS_COLUMN_WIDTH};

/// Coin list configuration, loadable from a JSON file.
/// Every field is optional in the file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoinListConfig {
    /// Anonymity set threshold separating private from non-private coins
    pub privacy_level_strong: u32,

    /// Batch size above which the sorted view is rebuilt instead of patched
    pub reset_threshold: usize,

    /// Width reported for the status column while it is visible
    pub status_column_width: u16,
}

impl CoinListConfig {
    pub fn new() -> Self {
        Self {
            privacy_level_strong: DEFAULT_PRIVACY_LEVEL_STRONG,
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            status_column_width: STATUS_COLUMN_WIDTH,
        }
    }

    pub fn with_privacy_level_strong(mut self, threshold: u32) -> Self {
        self.privacy_level_strong = threshold;
        self
    }

    pub fn with_reset_threshold(mut self, threshold: usize) -> Self {
        self.reset_threshold = threshold;
        self
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize config")
    }
}

impl Default for CoinListConfig {
    fn default() -> Self {
        Self::new()
    }
}

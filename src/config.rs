use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::{AssetSources, AssetSpec};

pub const DEFAULT_CSS_URL: &str = "https://d3p8cpu0nuk1gf.cloudfront.net/graph-0.1.8.css";
pub const DEFAULT_SCRIPT_URL: &str = "https://d3p8cpu0nuk1gf.cloudfront.net/sfn-0.1.8.js";
pub const STATE_FILE_NAME: &str = "state.json";

/// Where the graph assets live and where they come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AssetConfig {
    pub cache_dir: PathBuf,
    pub css_url: String,
    pub script_url: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            css_url: DEFAULT_CSS_URL.to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
        }
    }
}

impl AssetConfig {
    /// Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn asset_spec(&self) -> AssetSpec {
        AssetSpec::in_dir(&self.cache_dir)
    }

    pub fn sources(&self) -> AssetSources {
        AssetSources {
            css_url: self.css_url.clone(),
            script_url: self.script_url.clone(),
        }
    }

    pub fn state_file(&self) -> PathBuf {
        self.cache_dir.join(STATE_FILE_NAME)
    }
}

fn default_cache_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir());

    home.join(".cache").join("toolkit-assist").join("visualization")
}

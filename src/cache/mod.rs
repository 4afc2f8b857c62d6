//! Local cache for the state-machine graph assets.
//!
//! The style sheet and script used to render a state machine are downloaded
//! once and reused until the configured URL changes. Whether a file needs
//! downloading is decided by [`refresh_decision`], a pure function; every
//! side effect goes through the capability traits in [`capabilities`].

pub mod capabilities;
pub mod fs;
pub mod http;
pub mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use capabilities::{AssetFetcher, AssetStorage, DirectoryMaker, StateStore};
pub use fs::TokioFileSystem;
pub use http::HttpFetcher;
pub use state::{JsonStateStore, MemoryStateStore};

use crate::error::{CacheError, Result};

pub const CSS_LAST_DOWNLOADED_URL_KEY: &str = "CSS_LAST_DOWNLOADED_URL";
pub const SCRIPTS_LAST_DOWNLOADED_URL_KEY: &str = "SCRIPTS_LAST_DOWNLOADED_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    pub css_file_path: PathBuf,
    pub js_file_path: PathBuf,
    pub dir_path: PathBuf,
}

impl AssetSpec {
    /// Standard layout: `graph.css` and `sfn.js` inside `dir_path`.
    pub fn in_dir(dir_path: impl Into<PathBuf>) -> Self {
        let dir_path = dir_path.into();
        Self {
            css_file_path: dir_path.join("graph.css"),
            js_file_path: dir_path.join("sfn.js"),
            dir_path,
        }
    }
}

/// Where the two assets are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSources {
    pub css_url: String,
    pub script_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFileUpdate {
    pub last_downloaded_url_key: String,
    pub current_url: String,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    UpToDate,
    Missing,
    UrlChanged,
}

impl RefreshDecision {
    pub fn requires_download(self) -> bool {
        !matches!(self, Self::UpToDate)
    }
}

/// A missing file always wins over the URL comparison. An unknown
/// remembered URL never equals `current_url`.
pub fn refresh_decision(
    file_exists: bool,
    remembered_url: Option<&str>,
    current_url: &str,
) -> RefreshDecision {
    if !file_exists {
        return RefreshDecision::Missing;
    }
    match remembered_url {
        Some(url) if url == current_url => RefreshDecision::UpToDate,
        _ => RefreshDecision::UrlChanged,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRefresh {
    pub css: RefreshDecision,
    pub script: RefreshDecision,
}

pub struct AssetCache {
    spec: AssetSpec,
    storage: Arc<dyn AssetStorage>,
    fetcher: Arc<dyn AssetFetcher>,
    state: Arc<dyn StateStore>,
    dir_maker: Option<Arc<dyn DirectoryMaker>>,
}

impl AssetCache {
    pub fn new(
        spec: AssetSpec,
        storage: Arc<dyn AssetStorage>,
        fetcher: Arc<dyn AssetFetcher>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            spec,
            storage,
            fetcher,
            state,
            dir_maker: None,
        }
    }

    pub fn with_dir_maker(mut self, dir_maker: Arc<dyn DirectoryMaker>) -> Self {
        self.dir_maker = Some(dir_maker);
        self
    }

    pub fn spec(&self) -> &AssetSpec {
        &self.spec
    }

    /// Fails with [`CacheError::MissingAsset`] for the first configured file
    /// that does not exist. Never creates anything.
    pub async fn confirm_cache_exists(&self) -> Result<()> {
        for path in [&self.spec.css_file_path, &self.spec.js_file_path] {
            if !self.storage.file_exists(path).await {
                return Err(CacheError::missing_asset(path.as_path()).into());
            }
        }
        Ok(())
    }

    pub async fn update_cached_file(&self, update: &CachedFileUpdate) -> Result<RefreshDecision> {
        let remembered = self.state.get(&update.last_downloaded_url_key);
        let exists = self.storage.file_exists(&update.file_path).await;
        let decision = refresh_decision(exists, remembered.as_deref(), &update.current_url);

        tracing::debug!(
            path = %update.file_path.display(),
            ?decision,
            "cache refresh decision"
        );

        if !decision.requires_download() {
            return Ok(decision);
        }

        if let Some(parent) = update.file_path.parent() {
            self.ensure_dir(parent).await?;
        }

        let contents = self.fetcher.get_file_data(&update.current_url).await?;
        self.storage.write_file(&update.file_path, &contents).await?;
        self.state
            .set(&update.last_downloaded_url_key, &update.current_url)?;

        tracing::info!(
            url = %update.current_url,
            path = %update.file_path.display(),
            "downloaded asset"
        );

        Ok(decision)
    }

    /// Refreshes the style sheet, then the script.
    pub async fn update_cache(&self, sources: &AssetSources) -> Result<CacheRefresh> {
        let css = self
            .update_cached_file(&CachedFileUpdate {
                last_downloaded_url_key: CSS_LAST_DOWNLOADED_URL_KEY.to_string(),
                current_url: sources.css_url.clone(),
                file_path: self.spec.css_file_path.clone(),
            })
            .await?;

        let script = self
            .update_cached_file(&CachedFileUpdate {
                last_downloaded_url_key: SCRIPTS_LAST_DOWNLOADED_URL_KEY.to_string(),
                current_url: sources.script_url.clone(),
                file_path: self.spec.js_file_path.clone(),
            })
            .await?;

        Ok(CacheRefresh { css, script })
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<()> {
        let Some(dir_maker) = &self.dir_maker else {
            return Ok(());
        };
        if dir.as_os_str().is_empty() || self.storage.file_exists(dir).await {
            return Ok(());
        }
        dir_maker.make_dir(dir).await?;
        Ok(())
    }
}

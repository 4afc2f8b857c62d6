use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cached asset is missing: {path}")]
    MissingAsset { path: PathBuf },

    #[error("failed to persist state key '{key}': {source}")]
    State {
        key: String,
        source: std::io::Error,
    },

    #[error("state file '{path}' is not a JSON object of strings: {source}")]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CacheError {
    pub fn missing_asset(path: impl Into<PathBuf>) -> Self {
        Self::MissingAsset { path: path.into() }
    }

    pub fn state(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::State {
            key: key.into(),
            source,
        }
    }

    pub fn corrupt_state(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::CorruptState {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_asset_display() {
        let err = CacheError::missing_asset("/cache/graph.css");
        assert_eq!(err.to_string(), "cached asset is missing: /cache/graph.css");
    }

    #[test]
    fn test_state_keeps_io_source() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = CacheError::state("CSS_LAST_DOWNLOADED_URL", source);

        assert_eq!(
            err.to_string(),
            "failed to persist state key 'CSS_LAST_DOWNLOADED_URL': read-only"
        );
        let source = err.source().unwrap().downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_corrupt_state_keeps_json_source() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = CacheError::corrupt_state("/cache/state.json", source);
        assert!(err.source().unwrap().is::<serde_json::Error>());
    }
}

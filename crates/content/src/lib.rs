//! Content sources and the local asset cache for anchorwall.
//!
//! - [`HttpContentSource`]: fetches `{"photos": [...]}` from an endpoint
//! - [`FileContentSource`]: reads the same payload from a local file
//! - [`DirAssetCache`]: resolves cached photo and plaque files on disk
//! - [`ManifestStore`]: the anchor manifest, also the render surface

pub mod payload;
pub mod http;
pub mod file;
pub mod assets;
pub mod anchors;

pub use payload::parse_payload;
pub use http::HttpContentSource;
pub use file::FileContentSource;
pub use assets::DirAssetCache;
pub use anchors::ManifestStore;

use anchorwall_config::{AssetConfig, ContentConfig};
use anchorwall_core::error::SourceError;
use anchorwall_core::source::ContentSource;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Build the content source named in the configuration.
pub fn source_from_config(config: &ContentConfig) -> Result<Arc<dyn ContentSource>, SourceError> {
    match config.source.as_str() {
        "http" => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                SourceError::NotConfigured("content.endpoint is not set".into())
            })?;
            let source =
                HttpContentSource::new(endpoint, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(source))
        }
        "file" => Ok(Arc::new(FileContentSource::new(PathBuf::from(&config.path)))),
        other => Err(SourceError::NotConfigured(format!(
            "unknown content source '{other}'"
        ))),
    }
}

/// Build the asset cache described in the configuration.
pub fn assets_from_config(config: &AssetConfig) -> DirAssetCache {
    DirAssetCache::new(
        PathBuf::from(&config.cache_dir),
        PathBuf::from(&config.plaque_dir),
    )
    .with_plaque_extension(&config.plaque_extension)
}

//! Content source and asset cache traits: where photos and their bytes come from.

use crate::content::ContentItem;
use crate::error::{AssetError, SourceError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Delivers the full content list on every fetch.
///
/// Implementations: HTTP endpoint, local JSON file, scripted (for testing).
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// The source name (e.g., "http", "file").
    fn name(&self) -> &str;

    /// Fetch every content item. A failure means "no change" to callers.
    async fn fetch_all(&self) -> std::result::Result<Vec<ContentItem>, SourceError>;
}

/// Local cache of downloaded image bytes.
#[async_trait]
pub trait AssetCache: Send + Sync {
    /// Whether the cache has finished its initial sync and can be read.
    ///
    /// Called at the start of every pass; implementations may refresh
    /// whatever listing `local_path_for` resolves against.
    async fn is_ready(&self) -> bool;

    /// Local path of the cached primary image, if present.
    fn local_path_for(&self, item: &ContentItem) -> Option<PathBuf>;

    /// Local path of the cached plaque image, if present.
    fn local_path_for_plaque(&self, plaque_id: &str) -> Option<PathBuf>;

    /// Read the bytes of a cached asset.
    async fn read(&self, path: &Path) -> std::result::Result<Vec<u8>, AssetError>;
}

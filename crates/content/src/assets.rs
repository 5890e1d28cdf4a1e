//! Directory-backed asset cache.
//!
//! Photos are cached under `cache_dir` by file name; when the file name is
//! unknown or missing, a file whose stem is the content id is accepted.
//! Plaques live under `plaque_dir` as `<plaque_id>.<extension>`.
//!
//! Lookups never touch the disk. `is_ready` rescans both directories and
//! the resolvers answer from that listing, so names coming off the network
//! can only ever select a file that is directly inside the cache.

use anchorwall_core::content::ContentItem;
use anchorwall_core::error::AssetError;
use anchorwall_core::source::AssetCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, trace, warn};

/// Files directly inside one directory, keyed by name and by stem.
#[derive(Debug, Default)]
struct DirListing {
    by_name: HashMap<String, PathBuf>,
    by_stem: HashMap<String, PathBuf>,
}

impl DirListing {
    async fn scan(dir: &Path) -> std::io::Result<Self> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                files.push((name, entry.path()));
            }
        }
        // Stable winner when two files share a stem
        files.sort();

        let mut listing = Self::default();
        for (name, path) in files {
            if let Some(stem) = Path::new(&name).file_stem().and_then(|s| s.to_str()) {
                listing
                    .by_stem
                    .entry(stem.to_string())
                    .or_insert_with(|| path.clone());
            }
            listing.by_name.insert(name, path);
        }
        Ok(listing)
    }
}

pub struct DirAssetCache {
    cache_dir: PathBuf,
    plaque_dir: PathBuf,
    plaque_extension: String,
    photos: RwLock<DirListing>,
    plaques: RwLock<DirListing>,
}

impl DirAssetCache {
    pub fn new(cache_dir: PathBuf, plaque_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            plaque_dir,
            plaque_extension: "png".into(),
            photos: RwLock::new(DirListing::default()),
            plaques: RwLock::new(DirListing::default()),
        }
    }

    pub fn with_plaque_extension(mut self, extension: &str) -> Self {
        self.plaque_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn lookup(
        listing: &RwLock<DirListing>,
        find: impl FnOnce(&DirListing) -> Option<&PathBuf>,
    ) -> Option<PathBuf> {
        let listing = listing.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        find(&listing).cloned()
    }

    fn replace(listing: &RwLock<DirListing>, fresh: DirListing) {
        *listing.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = fresh;
    }
}

/// `name` if it is exactly one plain path component, e.g. `beach.jpg`.
/// Absolute paths and anything with `..` or a separator are refused.
fn plain_file_name(name: &str) -> Option<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Some(name),
        _ => None,
    }
}

#[async_trait]
impl AssetCache for DirAssetCache {
    async fn is_ready(&self) -> bool {
        let photos = match DirListing::scan(&self.cache_dir).await {
            Ok(listing) => listing,
            Err(e) => {
                debug!(dir = %self.cache_dir.display(), error = %e, "Asset cache not readable");
                Self::replace(&self.photos, DirListing::default());
                return false;
            }
        };
        debug!(dir = %self.cache_dir.display(), files = photos.by_name.len(), "Asset cache scanned");
        Self::replace(&self.photos, photos);

        // A missing plaque directory only means no plaques
        let plaques = DirListing::scan(&self.plaque_dir).await.unwrap_or_default();
        Self::replace(&self.plaques, plaques);
        true
    }

    fn local_path_for(&self, item: &ContentItem) -> Option<PathBuf> {
        if !item.name.is_empty() {
            match plain_file_name(&item.name) {
                Some(name) => {
                    if let Some(path) = Self::lookup(&self.photos, |l| l.by_name.get(name)) {
                        return Some(path);
                    }
                }
                None => warn!(content = %item.id, name = %item.name, "Refusing asset name outside the cache"),
            }
        }

        let found = plain_file_name(item.id.as_str())
            .and_then(|stem| Self::lookup(&self.photos, |l| l.by_stem.get(stem)));
        if found.is_none() {
            trace!(content = %item.id, "No cached asset");
        }
        found
    }

    fn local_path_for_plaque(&self, plaque_id: &str) -> Option<PathBuf> {
        let Some(plaque_id) = plain_file_name(plaque_id) else {
            warn!(plaque = plaque_id, "Refusing plaque id outside the plaque directory");
            return None;
        };
        let name = format!("{plaque_id}.{}", self.plaque_extension);
        Self::lookup(&self.plaques, |l| l.by_name.get(&name))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        tokio::fs::read(path).await.map_err(|e| AssetError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache_with(files: &[&str], plaques: &[&str]) -> (tempfile::TempDir, DirAssetCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        let plaque_dir = cache_dir.join("plaques");
        std::fs::create_dir_all(&plaque_dir).unwrap();
        for f in files {
            std::fs::write(cache_dir.join(f), b"img").unwrap();
        }
        for p in plaques {
            std::fs::write(plaque_dir.join(p), b"plaque").unwrap();
        }
        let cache = DirAssetCache::new(cache_dir, plaque_dir);
        assert!(cache.is_ready().await);
        (dir, cache)
    }

    #[tokio::test]
    async fn resolves_by_file_name_then_id() {
        let (_dir, cache) = cache_with(&["beach.jpg", "42.png"], &[]).await;

        let by_name = ContentItem::new("1", "beach.jpg", "beach");
        assert!(cache.local_path_for(&by_name).unwrap().ends_with("beach.jpg"));

        let by_id = ContentItem::new("42", "", "pier");
        assert!(cache.local_path_for(&by_id).unwrap().ends_with("42.png"));

        let missing = ContentItem::new("7", "nothing.jpg", "x");
        assert!(cache.local_path_for(&missing).is_none());
    }

    #[tokio::test]
    async fn resolves_plaques_with_extension() {
        let (_dir, cache) = cache_with(&[], &["p1.png"]).await;
        assert!(cache.local_path_for_plaque("p1").is_some());
        assert!(cache.local_path_for_plaque("p2").is_none());
    }

    #[tokio::test]
    async fn names_cannot_escape_the_cache() {
        let (dir, cache) = cache_with(&["beach.jpg"], &["p1.png"]).await;
        std::fs::write(dir.path().join("secret.jpg"), b"secret").unwrap();
        let outside = dir.path().join("secret.jpg");

        for name in [
            outside.to_string_lossy().to_string(),
            "../secret.jpg".to_string(),
            "../../../../../../etc/hostname".to_string(),
            "/etc/hostname".to_string(),
            "plaques/p1.png".to_string(),
        ] {
            let item = ContentItem::new("9", name.clone(), "beach");
            assert_eq!(cache.local_path_for(&item), None, "{name} resolved");
        }

        assert!(cache.local_path_for_plaque("../cache/plaques/p1").is_none());
        assert!(cache.local_path_for_plaque("/etc/hostname").is_none());
        assert!(cache.local_path_for_plaque("p1").is_some());
    }

    #[tokio::test]
    async fn listing_is_refreshed_by_readiness_check() {
        let (dir, cache) = cache_with(&[], &[]).await;
        let item = ContentItem::new("5", "late.jpg", "beach");
        assert!(cache.local_path_for(&item).is_none());

        std::fs::write(dir.path().join("cache/late.jpg"), b"img").unwrap();
        assert!(cache.local_path_for(&item).is_none());

        assert!(cache.is_ready().await);
        assert!(cache.local_path_for(&item).unwrap().ends_with("late.jpg"));
    }

    #[tokio::test]
    async fn reads_bytes_and_reports_readiness() {
        let (_dir, cache) = cache_with(&["a.jpg"], &[]).await;

        let path = cache.local_path_for(&ContentItem::new("1", "a.jpg", "a")).unwrap();
        assert_eq!(cache.read(&path).await.unwrap(), b"img".to_vec());

        let gone = DirAssetCache::new(PathBuf::from("/nonexistent/cache"), PathBuf::from("/x"));
        assert!(!gone.is_ready().await);
        assert!(gone.read(Path::new("/nonexistent/cache/a.jpg")).await.is_err());
    }
}

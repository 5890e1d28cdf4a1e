//! File content source: reads a saved photo listing from disk.

use crate::payload::parse_payload;
use anchorwall_core::content::ContentItem;
use anchorwall_core::error::SourceError;
use anchorwall_core::source::ContentSource;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct FileContentSource {
    path: PathBuf,
}

impl FileContentSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self) -> Result<Vec<ContentItem>, SourceError> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::Network(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        parse_payload(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_listing_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"photos":[{{"id":"1","filename":"a.jpg","tags":"a"}}]}}"#).unwrap();

        let source = FileContentSource::new(tmp.path().to_path_buf());
        let items = source.fetch_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tags, "a");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = FileContentSource::new(PathBuf::from("/nonexistent/photos.json"));
        assert!(source.fetch_all().await.is_err());
    }
}

//! Anchor manifest: a JSON file of placed anchors and what they display.
//!
//! The manifest is both the anchor store and the render surface: committing
//! content to an anchor records the label, image and plaque names on the
//! anchor's entry. Anchors keep the order they were created in.
//!
//! Without a path the manifest lives only in memory.

use anchorwall_core::anchor::{Anchor, AnchorId, AnchorKind};
use anchorwall_core::error::AnchorError;
use anchorwall_core::render::{Asset, RenderSurface};
use anchorwall_core::store::AnchorStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub struct ManifestStore {
    path: Option<PathBuf>,
    anchors: RwLock<Vec<Anchor>>,
}

impl ManifestStore {
    /// Open the manifest at `path`. A missing file starts empty; a file that
    /// cannot be parsed is an error rather than being overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AnchorError> {
        let path = path.into();
        let anchors = Self::load_from_disk(&path)?;
        debug!(path = %path.display(), count = anchors.len(), "Anchor manifest loaded");
        Ok(Self {
            path: Some(path),
            anchors: RwLock::new(anchors),
        })
    }

    pub fn in_memory(anchors: Vec<Anchor>) -> Self {
        Self {
            path: None,
            anchors: RwLock::new(anchors),
        }
    }

    fn load_from_disk(path: &Path) -> Result<Vec<Anchor>, AnchorError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AnchorError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|e| {
            AnchorError::Storage(format!("Corrupted manifest {}: {e}", path.display()))
        })
    }

    async fn flush(&self, anchors: &[Anchor]) -> Result<(), AnchorError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AnchorError::Storage(format!("Failed to create directory: {e}")))?;
        }
        let json = serde_json::to_string_pretty(anchors)
            .map_err(|e| AnchorError::Storage(format!("Failed to encode manifest: {e}")))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| AnchorError::Storage(format!("Failed to write {}: {e}", path.display())))
    }

    /// Place an anchor of the given kind.
    pub async fn create_kind(&self, name: &str, kind: AnchorKind) -> Result<Anchor, AnchorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnchorError::Storage("anchor name is empty".into()));
        }
        let anchor = match kind {
            AnchorKind::Placed => Anchor::placed(name),
            AnchorKind::Preview => Anchor::preview(name),
        };

        let mut anchors = self.anchors.write().await;
        anchors.push(anchor.clone());
        self.flush(&anchors).await?;
        debug!(anchor = %anchor.id, name, "Anchor created");
        Ok(anchor)
    }

    /// Apply `change` to one anchor and persist.
    async fn update(&self, id: &AnchorId, change: impl FnOnce(&mut Anchor)) -> Result<(), AnchorError> {
        let mut anchors = self.anchors.write().await;
        let anchor = anchors
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| AnchorError::NotFound(id.to_string()))?;
        change(anchor);
        self.flush(&anchors).await
    }

    async fn render(&self, anchor: &Anchor, step: &str, change: impl FnOnce(&mut Anchor)) -> bool {
        match self.update(&anchor.id, change).await {
            Ok(()) => true,
            Err(e) => {
                warn!(anchor = %anchor.id, step, error = %e, "Render step not applied");
                false
            }
        }
    }
}

#[async_trait]
impl AnchorStore for ManifestStore {
    fn name(&self) -> &str {
        "manifest"
    }

    async fn list(&self) -> Result<Vec<Anchor>, AnchorError> {
        Ok(self.anchors.read().await.clone())
    }

    async fn create(&self, name: &str) -> Result<Anchor, AnchorError> {
        self.create_kind(name, AnchorKind::Placed).await
    }

    async fn remove_last(&self) -> Result<Option<Anchor>, AnchorError> {
        let mut anchors = self.anchors.write().await;
        let removed = anchors.pop();
        if removed.is_some() {
            self.flush(&anchors).await?;
        }
        Ok(removed)
    }

    async fn clear(&self) -> Result<usize, AnchorError> {
        let mut anchors = self.anchors.write().await;
        let count = anchors.len();
        anchors.clear();
        self.flush(&anchors).await?;
        Ok(count)
    }
}

#[async_trait]
impl RenderSurface for ManifestStore {
    async fn set_label(&self, anchor: &Anchor, text: &str) -> bool {
        let text = text.to_string();
        self.render(anchor, "label", move |a| a.label = Some(text))
            .await
    }

    async fn set_image(&self, anchor: &Anchor, image: &Asset) -> bool {
        if image.bytes.is_empty() {
            return false;
        }
        let name = image.name.clone();
        self.render(anchor, "image", move |a| a.displayed_asset = Some(name))
            .await
    }

    async fn set_plaque(&self, anchor: &Anchor, plaque: &Asset) -> bool {
        if plaque.bytes.is_empty() {
            return false;
        }
        let name = plaque.name.clone();
        self.render(anchor, "plaque", move |a| a.plaque_asset = Some(name))
            .await
    }
}

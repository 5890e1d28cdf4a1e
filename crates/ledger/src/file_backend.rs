//! File-based ledger: persistent JSON-lines storage.
//!
//! Each line is a JSON-encoded `LedgerEntry`, one per anchor.
//!
//! Storage location: `~/.anchorwall/ledger.jsonl` by default.

use crate::in_memory::upsert;
use anchorwall_core::anchor::AnchorId;
use anchorwall_core::error::LedgerError;
use anchorwall_core::ledger::{BindingLedger, LedgerEntry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A file-backed ledger using JSONL (one JSON object per line).
///
/// Entries are loaded on creation and flushed to disk on every mutation
/// (record, remove, clear).
pub struct FileLedger {
    path: PathBuf,
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl FileLedger {
    /// Create a ledger at the given path.
    ///
    /// If the file exists, entries are loaded from it.
    /// If the file does not exist, starts empty (file created on first write).
    pub fn new(path: PathBuf) -> Self {
        let entries = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = entries.len(), "File ledger loaded");
        Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    fn load_from_disk(path: &Path) -> Vec<LedgerEntry> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        let mut entries = Vec::new();
        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            match serde_json::from_str::<LedgerEntry>(line) {
                // Later lines win if a hand-edited file repeats an anchor
                Ok(entry) => upsert(&mut entries, entry),
                Err(e) => warn!(error = %e, "Skipping corrupted ledger entry"),
            }
        }
        entries
    }

    /// Flush all entries to disk as JSONL.
    async fn flush(&self) -> Result<(), LedgerError> {
        let entries = self.entries.read().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LedgerError::Storage(format!("Failed to create ledger directory: {e}"))
            })?;
        }

        let mut content = String::new();
        for entry in entries.iter() {
            let line = serde_json::to_string(entry)
                .map_err(|e| LedgerError::Serialization(e.to_string()))?;
            content.push_str(&line);
            content.push('\n');
        }

        tokio::fs::write(&self.path, &content)
            .await
            .map_err(|e| LedgerError::Storage(format!("Failed to write ledger file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl BindingLedger for FileLedger {
    fn name(&self) -> &str {
        "file"
    }

    async fn record(&self, entry: LedgerEntry) -> Result<(), LedgerError> {
        upsert(&mut *self.entries.write().await, entry);
        self.flush().await
    }

    async fn get(&self, anchor_id: &AnchorId) -> Result<Option<LedgerEntry>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| &e.anchor_id == anchor_id).cloned())
    }

    async fn remove(&self, anchor_id: &AnchorId) -> Result<bool, LedgerError> {
        let mut entries = self.entries.write().await;
        let len_before = entries.len();
        entries.retain(|e| &e.anchor_id != anchor_id);
        let removed = entries.len() < len_before;
        drop(entries);
        if removed {
            self.flush().await?;
        }
        Ok(removed)
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.entries.read().await.clone())
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.entries.read().await.len())
    }

    async fn clear(&self) -> Result<(), LedgerError> {
        self.entries.write().await.clear();
        self.flush().await
    }
}

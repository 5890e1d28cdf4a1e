//! In-memory ledger: useful for testing and single-session runs.

use anchorwall_core::anchor::AnchorId;
use anchorwall_core::error::LedgerError;
use anchorwall_core::ledger::{BindingLedger, LedgerEntry};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A ledger that keeps entries in a Vec, one per anchor.
pub struct InMemoryLedger {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the entry for the same anchor, or append.
pub(crate) fn upsert(entries: &mut Vec<LedgerEntry>, entry: LedgerEntry) {
    match entries.iter_mut().find(|e| e.anchor_id == entry.anchor_id) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

#[async_trait]
impl BindingLedger for InMemoryLedger {
    fn name(&self) -> &str { "in_memory" }

    async fn record(&self, entry: LedgerEntry) -> Result<(), LedgerError> {
        upsert(&mut *self.entries.write().await, entry);
        Ok(())
    }

    async fn get(&self, anchor_id: &AnchorId) -> Result<Option<LedgerEntry>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| &e.anchor_id == anchor_id).cloned())
    }

    async fn remove(&self, anchor_id: &AnchorId) -> Result<bool, LedgerError> {
        let mut entries = self.entries.write().await;
        let len_before = entries.len();
        entries.retain(|e| &e.anchor_id != anchor_id);
        Ok(entries.len() < len_before)
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.entries.read().await.clone())
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.entries.read().await.len())
    }

    async fn clear(&self) -> Result<(), LedgerError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

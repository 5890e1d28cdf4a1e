//! Binding ledger trait: what is currently placed on which anchor.
//!
//! The ledger is written at commit time and consulted before falling back to
//! inspecting what an anchor displays. It is advisory: the engine never
//! refuses a binding because of it, and anchors created before the ledger
//! existed simply have no entry.

use crate::anchor::AnchorId;
use crate::content::ContentId;
use crate::error::LedgerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One anchor → content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub anchor_id: AnchorId,

    pub content_id: ContentId,

    /// The image asset that was rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,

    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(anchor_id: AnchorId, content_id: ContentId, asset_name: Option<String>) -> Self {
        Self {
            anchor_id,
            content_id,
            asset_name,
            recorded_at: Utc::now(),
        }
    }
}

/// The core BindingLedger trait.
///
/// Implementations: JSONL file, in-memory (for testing), none (no-op).
#[async_trait]
pub trait BindingLedger: Send + Sync {
    /// The backend name (e.g., "file", "memory", "none").
    fn name(&self) -> &str;

    /// Record a binding, replacing any previous entry for the same anchor.
    async fn record(&self, entry: LedgerEntry) -> std::result::Result<(), LedgerError>;

    /// Get the entry for an anchor.
    async fn get(&self, anchor_id: &AnchorId) -> std::result::Result<Option<LedgerEntry>, LedgerError>;

    /// Remove the entry for an anchor. Returns whether one existed.
    async fn remove(&self, anchor_id: &AnchorId) -> std::result::Result<bool, LedgerError>;

    /// All entries in recording order.
    async fn entries(&self) -> std::result::Result<Vec<LedgerEntry>, LedgerError>;

    /// Number of entries.
    async fn count(&self) -> std::result::Result<usize, LedgerError>;

    /// Remove every entry.
    async fn clear(&self) -> std::result::Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_entry_serialization() {
        let entry = LedgerEntry::new(
            AnchorId::from("a-1"),
            ContentId::from("42"),
            Some("42_pier.jpg".into()),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"anchor_id\":\"a-1\""));
        assert!(json.contains("42_pier.jpg"));
        let back: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}

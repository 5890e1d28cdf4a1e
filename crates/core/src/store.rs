//! Anchor store: enumeration and lifecycle of placed anchors.

use crate::anchor::Anchor;
use crate::error::AnchorError;
use async_trait::async_trait;

/// Supplies the anchor snapshot a pass runs against.
///
/// Enumeration order must be stable: the catalog preserves it and candidate
/// selection depends on it.
#[async_trait]
pub trait AnchorStore: Send + Sync {
    /// The store name (e.g., "manifest", "in_memory").
    fn name(&self) -> &str;

    /// All known anchors, placed and preview, in enumeration order.
    async fn list(&self) -> std::result::Result<Vec<Anchor>, AnchorError>;

    /// Place a new anchor with the given name.
    async fn create(&self, name: &str) -> std::result::Result<Anchor, AnchorError>;

    /// Remove the most recently created anchor.
    async fn remove_last(&self) -> std::result::Result<Option<Anchor>, AnchorError>;

    /// Remove every anchor. Returns how many were removed.
    async fn clear(&self) -> std::result::Result<usize, AnchorError>;
}

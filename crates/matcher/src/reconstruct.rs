//! Inferring which content is already on display.
//!
//! There is no authoritative record of what each anchor shows. The ledger is
//! consulted first; anchors without a ledger entry are correlated by the
//! name of the asset they currently render. Both sources can miss, so the
//! result is a lower bound: "probably already placed", never "definitely
//! not placed".

use anchorwall_core::anchor::Anchor;
use anchorwall_core::content::{ContentId, ContentItem};
use anchorwall_core::ledger::BindingLedger;
use anchorwall_core::source::AssetCache;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AssignmentReconstructor {
    assets: Arc<dyn AssetCache>,
    ledger: Arc<dyn BindingLedger>,
}

impl AssignmentReconstructor {
    pub fn new(assets: Arc<dyn AssetCache>, ledger: Arc<dyn BindingLedger>) -> Self {
        Self { assets, ledger }
    }

    /// Content ids that placed anchors appear to be showing.
    pub async fn currently_assigned_ids(
        &self,
        anchors: &[Anchor],
        content: &[ContentItem],
    ) -> HashSet<ContentId> {
        let mut assigned = HashSet::new();
        let cached = self.cached_names(content);

        for anchor in anchors.iter().filter(|a| a.is_placed()) {
            match self.ledger.get(&anchor.id).await {
                Ok(Some(entry)) => {
                    debug!(anchor = %anchor.id, content = %entry.content_id, "Assignment from ledger");
                    assigned.insert(entry.content_id);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(anchor = %anchor.id, error = %e, "Ledger lookup failed, using displayed asset");
                }
            }

            let Some(displayed) = anchor.displayed_asset.as_deref() else {
                continue;
            };
            if let Some(id) = correlate(displayed, &cached, content) {
                debug!(anchor = %anchor.id, content = %id, asset = displayed, "Assignment from displayed asset");
                assigned.insert(id);
            }
        }

        assigned
    }

    /// Lower-cased cached file name of every item that has one.
    fn cached_names<'c>(&self, content: &'c [ContentItem]) -> Vec<(String, &'c ContentId)> {
        content
            .iter()
            .filter_map(|item| {
                let path = self.assets.local_path_for(item)?;
                let name = file_name(&path.to_string_lossy()).to_lowercase();
                (!name.is_empty()).then_some((name, &item.id))
            })
            .collect()
    }
}

/// Match a displayed asset name back to a content item.
///
/// An exact cached file name wins. Otherwise the longest cached name found
/// inside the asset name is taken, and failing that the longest content id,
/// so `11.jpg` is never read as `1.jpg` and `"12"` beats `"1"` for `12_pier`.
fn correlate(
    displayed: &str,
    cached: &[(String, &ContentId)],
    content: &[ContentItem],
) -> Option<ContentId> {
    let displayed_name = file_name(displayed).to_lowercase();
    if displayed_name.is_empty() {
        return None;
    }

    if let Some((_, id)) = cached.iter().find(|(name, _)| *name == displayed_name) {
        return Some((*id).clone());
    }

    let by_cached_name = cached
        .iter()
        .filter(|(name, _)| displayed_name.contains(name.as_str()))
        .max_by_key(|(name, _)| name.len());
    if let Some((_, id)) = by_cached_name {
        return Some((*id).clone());
    }

    content
        .iter()
        .filter(|item| !item.id.is_blank())
        .filter(|item| displayed_name.contains(&item.id.as_str().to_lowercase()))
        .max_by_key(|item| item.id.as_str().len())
        .map(|item| item.id.clone())
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MapAssets;
    use anchorwall_core::anchor::AnchorId;
    use anchorwall_core::ledger::LedgerEntry;
    use anchorwall_ledger::{InMemoryLedger, NoopLedger};

    fn content() -> Vec<ContentItem> {
        vec![
            ContentItem::new("1", "beach.jpg", "beach"),
            ContentItem::new("12", "", "pier"),
            ContentItem::new("3", "forest.jpg", "forest"),
        ]
    }

    fn reconstructor(ledger: Arc<dyn BindingLedger>) -> AssignmentReconstructor {
        let assets = MapAssets::new()
            .with_file("beach.jpg", b"b")
            .with_file("forest.jpg", b"f");
        AssignmentReconstructor::new(Arc::new(assets), ledger)
    }

    #[tokio::test]
    async fn correlates_by_cached_file_name() {
        let r = reconstructor(Arc::new(NoopLedger));
        let anchors = vec![
            Anchor::placed("beach_horizontal").with_displayed_asset("/cache/beach.jpg"),
            Anchor::placed("forest_horizontal"),
        ];
        let ids = r.currently_assigned_ids(&anchors, &content()).await;
        assert_eq!(ids, [ContentId::from("1")].into_iter().collect());
    }

    #[tokio::test]
    async fn falls_back_to_longest_id_substring() {
        let r = reconstructor(Arc::new(NoopLedger));
        let anchors = vec![Anchor::placed("pier_horizontal").with_displayed_asset("photo_12_full")];
        let ids = r.currently_assigned_ids(&anchors, &content()).await;
        assert!(ids.contains(&ContentId::from("12")));
        assert!(!ids.contains(&ContentId::from("1")));
    }

    #[tokio::test]
    async fn overlapping_cached_names_resolve_to_the_displayed_file() {
        let assets = MapAssets::new()
            .with_file("1.jpg", b"a")
            .with_file("11.jpg", b"b")
            .with_file("111.jpg", b"c");
        let r = AssignmentReconstructor::new(Arc::new(assets), Arc::new(NoopLedger));
        let content = vec![
            ContentItem::new("1", "1.jpg", "beach"),
            ContentItem::new("11", "11.jpg", "beach"),
            ContentItem::new("111", "111.jpg", "beach"),
        ];

        let showing_11 = vec![Anchor::placed("beach_horizontal").with_displayed_asset("/cache/11.jpg")];
        let ids = r.currently_assigned_ids(&showing_11, &content).await;
        assert_eq!(ids, [ContentId::from("11")].into_iter().collect());

        // Renamed on display: the longest cached name inside it wins
        let showing_copy = vec![Anchor::placed("beach_horizontal").with_displayed_asset("copy_of_111.jpg")];
        let ids = r.currently_assigned_ids(&showing_copy, &content).await;
        assert_eq!(ids, [ContentId::from("111")].into_iter().collect());

        let both = vec![
            Anchor::placed("beach_horizontal").with_displayed_asset("1.jpg"),
            Anchor::placed("beach_horizontal").with_displayed_asset("111.jpg"),
        ];
        let ids = r.currently_assigned_ids(&both, &content).await;
        assert_eq!(ids, [ContentId::from("1"), ContentId::from("111")].into_iter().collect());
    }

    #[tokio::test]
    async fn ledger_entry_wins_over_display() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger
            .record(LedgerEntry::new(AnchorId::from("a1"), ContentId::from("3"), None))
            .await
            .unwrap();
        let r = reconstructor(ledger);

        let anchors = vec![
            Anchor::placed("beach_horizontal")
                .with_id("a1")
                .with_displayed_asset("beach.jpg"),
        ];
        let ids = r.currently_assigned_ids(&anchors, &content()).await;
        assert_eq!(ids, [ContentId::from("3")].into_iter().collect());
    }

    #[tokio::test]
    async fn previews_and_unknown_assets_contribute_nothing() {
        let r = reconstructor(Arc::new(NoopLedger));
        let anchors = vec![
            Anchor::preview("beach_horizontal").with_displayed_asset("beach.jpg"),
            Anchor::placed("lake_horizontal").with_displayed_asset("sunset.png"),
        ];
        assert!(r.currently_assigned_ids(&anchors, &content()).await.is_empty());
    }
}

//! Candidate selection strategy.
//!
//! The engine gathers candidates and hands the whole list to a selector, so
//! a scoring strategy can replace first-found-wins without touching the
//! pass logic.

use anchorwall_core::anchor::Anchor;
use anchorwall_core::content::ContentItem;

pub trait AnchorSelector: Send + Sync {
    fn name(&self) -> &str;

    /// Pick one of `candidates` (in catalog order) for `item`, or none.
    fn select<'a>(&self, item: &ContentItem, candidates: &[&'a Anchor]) -> Option<&'a Anchor>;
}

/// First candidate in catalog order. No scoring, no backtracking.
pub struct FirstCandidate;

impl AnchorSelector for FirstCandidate {
    fn name(&self) -> &str {
        "first_candidate"
    }

    fn select<'a>(&self, _item: &ContentItem, candidates: &[&'a Anchor]) -> Option<&'a Anchor> {
        candidates.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_takes_catalog_order() {
        let a = Anchor::placed("lake_horizontal").with_id("a");
        let b = Anchor::placed("lake_horizontal").with_id("b");
        let item = ContentItem::new("1", "x.jpg", "lake");

        let picked = FirstCandidate.select(&item, &[&a, &b]).unwrap();
        assert_eq!(picked.id.as_str(), "a");
        assert!(FirstCandidate.select(&item, &[]).is_none());
    }
}

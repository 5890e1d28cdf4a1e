//! Anchor catalog: the candidate view of one anchor snapshot.
//!
//! The catalog keeps anchors in the order the store enumerated them; that
//! order is what "first candidate" means. Occupancy is pass-scoped: it is
//! reset when a pass starts and an anchor goes Free → Bound at most once
//! until the next reset.

use anchorwall_core::anchor::{Anchor, AnchorId};
use anchorwall_core::content::{MatchKey, Orientation};
use std::collections::{HashMap, HashSet};
use tracing::error;

/// Whether an anchor already received content in the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Free,
    Bound,
}

pub struct AnchorCatalog {
    anchors: Vec<Anchor>,
    occupancy: HashMap<AnchorId, Occupancy>,
}

impl AnchorCatalog {
    /// Build a catalog from an anchor snapshot.
    ///
    /// Anchors with no resolvable name are dropped and reported; they can
    /// never be matched and indicate corrupted anchor data.
    pub fn new(anchors: Vec<Anchor>) -> Self {
        let anchors: Vec<Anchor> = anchors
            .into_iter()
            .filter(|anchor| match anchor.validate() {
                Ok(()) => true,
                Err(violation) => {
                    error!(anchor = %anchor.id, %violation, "Dropping anchor from catalog");
                    false
                }
            })
            .collect();

        let occupancy = anchors
            .iter()
            .map(|a| (a.id.clone(), Occupancy::Free))
            .collect();

        Self { anchors, occupancy }
    }

    /// Every anchor in enumeration order, placed and preview.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Placed anchors only.
    pub fn placed(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter().filter(|a| a.is_placed())
    }

    pub fn get(&self, id: &AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| &a.id == id)
    }

    /// Placed anchors whose tag contains `key` (case-insensitive), whose
    /// orientation matches, and which are not excluded.
    pub fn find_candidates(
        &self,
        key: &MatchKey,
        orientation: Orientation,
        excluding: &HashSet<AnchorId>,
    ) -> Vec<&Anchor> {
        self.placed()
            .filter(|a| key.is_contained_in(a.tag()))
            .filter(|a| a.orientation() == orientation)
            .filter(|a| !excluding.contains(&a.id))
            .collect()
    }

    /// Mark every anchor free. Called at the start of each pass.
    pub fn reset_occupancy(&mut self) {
        for state in self.occupancy.values_mut() {
            *state = Occupancy::Free;
        }
    }

    /// Transition an anchor Free → Bound.
    ///
    /// Returns `false` if the anchor is unknown or already bound in this pass.
    pub fn mark_bound(&mut self, id: &AnchorId) -> bool {
        match self.occupancy.get_mut(id) {
            Some(state) if *state == Occupancy::Free => {
                *state = Occupancy::Bound;
                true
            }
            _ => false,
        }
    }

    pub fn occupancy(&self, id: &AnchorId) -> Option<Occupancy> {
        self.occupancy.get(id).copied()
    }

    pub fn is_free(&self, id: &AnchorId) -> bool {
        self.occupancy(id) == Some(Occupancy::Free)
    }

    /// Number of placed anchors still free in this pass.
    pub fn free_count(&self) -> usize {
        self.placed().filter(|a| self.is_free(&a.id)).count()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

//! Assignment engine: decides which content goes on which anchor.
//!
//! Both modes share one primitive, [`AssignmentEngine::match_one`]:
//!
//! - **Batch** ([`AssignmentEngine::run_pass`]): walk the content list
//!   (priority items first) and bind each item to the first free candidate
//!   anchor whose tag contains the item's key.
//! - **Incremental** ([`AssignmentEngine::match_single_anchor`]): one new
//!   anchor searches the content list for an item whose key equals its tag,
//!   skipping content that already appears to be on display.
//!
//! Every expected condition (no key, no candidate, failed render) is an
//! outcome value. Nothing here returns an error to the caller.

use crate::catalog::AnchorCatalog;
use crate::reconstruct::AssignmentReconstructor;
use crate::selector::{AnchorSelector, FirstCandidate};
use crate::tag::extract_key;
use anchorwall_core::anchor::{Anchor, AnchorId};
use anchorwall_core::binding::{Binding, CommitReport, StepOutcome};
use anchorwall_core::content::{ContentId, ContentItem, MatchKey};
use anchorwall_core::error::ContractViolation;
use anchorwall_core::event::{DomainEvent, EventBus};
use anchorwall_core::ledger::{BindingLedger, LedgerEntry};
use anchorwall_core::render::{Asset, RenderSurface};
use anchorwall_core::source::AssetCache;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of the matching primitive for one content item.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchAttempt {
    /// The item has no extractable key
    Unmatchable,
    /// The key matched no free anchor
    NoCandidate(MatchKey),
    /// The selector picked this anchor
    Candidate { key: MatchKey, anchor: Anchor },
}

/// What happened to one content item during a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Bound(Binding),
    Unmatchable {
        content_id: ContentId,
    },
    NoCandidate {
        content_id: ContentId,
        key: MatchKey,
    },
    /// A candidate was found but every commit step failed; the anchor stays free.
    CommitFailed {
        content_id: ContentId,
        anchor_id: AnchorId,
        report: CommitReport,
    },
    /// The item broke a data contract and was not processed.
    Rejected {
        violation: ContractViolation,
    },
}

impl ItemOutcome {
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            ItemOutcome::Unmatchable { .. } | ItemOutcome::NoCandidate { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassStatus {
    Completed,
    /// A collaborator was unavailable; nothing was attempted.
    NotReady(String),
}

/// The result of one batch pass.
#[derive(Debug, Clone)]
pub struct PassResult {
    pub status: PassStatus,
    /// One entry per processed item, in processing order
    pub outcomes: Vec<ItemOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PassResult {
    pub fn not_ready(reason: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            status: PassStatus::NotReady(reason.into()),
            outcomes: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PassStatus::Completed
    }

    pub fn hits(&self) -> usize {
        self.bindings().len()
    }

    pub fn misses(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_miss()).count()
    }

    pub fn commit_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::CommitFailed { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Rejected { .. }))
            .count()
    }

    pub fn bindings(&self) -> Vec<&Binding> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Bound(binding) => Some(binding),
                _ => None,
            })
            .collect()
    }
}

/// Result of binding one freshly created anchor.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleAnchorOutcome {
    Bound(Binding),
    /// No unassigned content has this anchor's key and orientation
    NoSuitableContent,
    CommitFailed {
        content_id: ContentId,
        report: CommitReport,
    },
    /// Preview anchors are never bound
    Ineligible,
    Rejected(ContractViolation),
    NotReady(String),
}

pub struct AssignmentEngine {
    surface: Arc<dyn RenderSurface>,
    assets: Arc<dyn AssetCache>,
    ledger: Arc<dyn BindingLedger>,
    reconstructor: AssignmentReconstructor,
    selector: Box<dyn AnchorSelector>,
    events: Option<Arc<EventBus>>,
}

impl AssignmentEngine {
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        assets: Arc<dyn AssetCache>,
        ledger: Arc<dyn BindingLedger>,
    ) -> Self {
        let reconstructor = AssignmentReconstructor::new(assets.clone(), ledger.clone());
        Self {
            surface,
            assets,
            ledger,
            reconstructor,
            selector: Box::new(FirstCandidate),
            events: None,
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn AnchorSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn reconstructor(&self) -> &AssignmentReconstructor {
        &self.reconstructor
    }

    /// Find an anchor for one item, ignoring anchors in `used`.
    pub fn match_one(
        &self,
        item: &ContentItem,
        catalog: &AnchorCatalog,
        used: &HashSet<AnchorId>,
    ) -> MatchAttempt {
        let Some(key) = extract_key(&item.tags) else {
            return MatchAttempt::Unmatchable;
        };

        let candidates = catalog.find_candidates(&key, item.orientation(), used);
        match self.selector.select(item, &candidates) {
            Some(anchor) => MatchAttempt::Candidate {
                key,
                anchor: anchor.clone(),
            },
            None => MatchAttempt::NoCandidate(key),
        }
    }

    /// Run one batch pass over `content`.
    ///
    /// Items listed in `priority_ids` go first, in the order of that slice;
    /// everything else follows in list order. Occupancy is reset on entry, so
    /// the same inputs always produce the same bindings.
    pub async fn run_pass(
        &self,
        catalog: &mut AnchorCatalog,
        content: &[ContentItem],
        priority_ids: &[ContentId],
    ) -> PassResult {
        if !self.assets.is_ready().await {
            warn!("Asset cache not ready, skipping pass");
            self.publish(DomainEvent::PassSkipped {
                reason: "asset cache not ready".into(),
                timestamp: Utc::now(),
            });
            return PassResult::not_ready("asset cache not ready");
        }

        let started_at = Utc::now();
        catalog.reset_occupancy();

        let mut used: HashSet<AnchorId> = HashSet::new();
        let mut seen: HashSet<&ContentId> = HashSet::new();
        let mut outcomes = Vec::with_capacity(content.len());

        for item in processing_order(content, priority_ids) {
            if let Err(violation) = item.validate() {
                error!(%violation, "Rejecting content item");
                outcomes.push(ItemOutcome::Rejected { violation });
                continue;
            }
            if !seen.insert(&item.id) {
                let violation = ContractViolation::DuplicateContent {
                    content_id: item.id.to_string(),
                };
                error!(%violation, "Rejecting content item");
                outcomes.push(ItemOutcome::Rejected { violation });
                continue;
            }

            let outcome = match self.match_one(item, catalog, &used) {
                MatchAttempt::Unmatchable => {
                    warn!(content = %item.id, tags = %item.tags, "No match key, skipping");
                    ItemOutcome::Unmatchable {
                        content_id: item.id.clone(),
                    }
                }
                MatchAttempt::NoCandidate(key) => {
                    debug!(content = %item.id, key = %key, orientation = %item.orientation(), "No free anchor");
                    ItemOutcome::NoCandidate {
                        content_id: item.id.clone(),
                        key,
                    }
                }
                MatchAttempt::Candidate { key, anchor } => {
                    match self.commit_and_record(&anchor, item, key).await {
                        Ok(binding) => {
                            used.insert(anchor.id.clone());
                            if !catalog.mark_bound(&anchor.id) {
                                warn!(anchor = %anchor.id, "Anchor was already bound in this pass");
                            }
                            ItemOutcome::Bound(binding)
                        }
                        Err(report) => ItemOutcome::CommitFailed {
                            content_id: item.id.clone(),
                            anchor_id: anchor.id.clone(),
                            report,
                        },
                    }
                }
            };
            outcomes.push(outcome);
        }

        let result = PassResult {
            status: PassStatus::Completed,
            outcomes,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            hits = result.hits(),
            misses = result.misses(),
            commit_failures = result.commit_failures(),
            rejected = result.rejected(),
            free_anchors = catalog.free_count(),
            "Pass complete"
        );
        self.publish(DomainEvent::PassCompleted {
            hits: result.hits(),
            misses: result.misses(),
            commit_failures: result.commit_failures(),
            timestamp: result.finished_at,
        });

        result
    }

    /// Bind content to one newly created anchor without touching the others.
    ///
    /// Content already shown on any of `all_anchors` is skipped. Candidates
    /// must have a key equal (not merely containing) the anchor's tag;
    /// items in `session_new` are preferred.
    pub async fn match_single_anchor(
        &self,
        anchor: &Anchor,
        all_anchors: &[Anchor],
        content: &[ContentItem],
        session_new: &[ContentId],
    ) -> SingleAnchorOutcome {
        if let Err(violation) = anchor.validate() {
            error!(%violation, "Rejecting anchor");
            return SingleAnchorOutcome::Rejected(violation);
        }
        if !anchor.is_placed() {
            debug!(anchor = %anchor.id, "Preview anchor, not matching");
            return SingleAnchorOutcome::Ineligible;
        }
        if !self.assets.is_ready().await {
            warn!(anchor = %anchor.id, "Asset cache not ready, skipping anchor");
            return SingleAnchorOutcome::NotReady("asset cache not ready".into());
        }

        let tag = anchor.tag();
        let orientation = anchor.orientation();
        let assigned = self
            .reconstructor
            .currently_assigned_ids(all_anchors, content)
            .await;

        let mut candidates: Vec<(&ContentItem, MatchKey)> = content
            .iter()
            .filter(|item| match item.validate() {
                Ok(()) => true,
                Err(violation) => {
                    error!(%violation, "Ignoring content item");
                    false
                }
            })
            .filter(|item| !assigned.contains(&item.id))
            .filter(|item| item.orientation() == orientation)
            .filter_map(|item| {
                extract_key(&item.tags)
                    .filter(|key| key.eq_ignore_case(tag))
                    .map(|key| (item, key))
            })
            .collect();
        candidates.sort_by_key(|(item, _)| !session_new.contains(&item.id));

        let Some((item, key)) = candidates.into_iter().next() else {
            info!(anchor = %anchor.id, tag, %orientation, already_assigned = assigned.len(), "No suitable content for anchor");
            return SingleAnchorOutcome::NoSuitableContent;
        };

        match self.commit_and_record(anchor, item, key).await {
            Ok(binding) => SingleAnchorOutcome::Bound(binding),
            Err(report) => SingleAnchorOutcome::CommitFailed {
                content_id: item.id.clone(),
                report,
            },
        }
    }

    /// Commit, then either record the binding or report the failure.
    async fn commit_and_record(
        &self,
        anchor: &Anchor,
        item: &ContentItem,
        key: MatchKey,
    ) -> Result<Binding, CommitReport> {
        let (report, asset_name) = self.commit(anchor, item, &key).await;

        if !report.any_applied() {
            warn!(anchor = %anchor.id, content = %item.id, "Every commit step failed, anchor left free");
            self.publish(DomainEvent::CommitFailed {
                anchor_id: anchor.id.to_string(),
                content_id: item.id.to_string(),
                timestamp: Utc::now(),
            });
            return Err(report);
        }

        let failures = report.failures();
        for (step, reason) in &failures {
            warn!(anchor = %anchor.id, content = %item.id, %step, reason, "Commit step failed");
        }

        let entry = LedgerEntry::new(anchor.id.clone(), item.id.clone(), asset_name);
        if let Err(e) = self.ledger.record(entry).await {
            warn!(anchor = %anchor.id, error = %e, "Failed to record binding in ledger");
        }

        self.publish(DomainEvent::BindingCommitted {
            anchor_id: anchor.id.to_string(),
            content_id: item.id.to_string(),
            failed_steps: failures.iter().map(|(step, _)| step.to_string()).collect(),
            timestamp: Utc::now(),
        });
        info!(anchor = %anchor.id, name = %anchor.name, content = %item.id, key = %key, "Bound content to anchor");

        Ok(Binding {
            anchor_id: anchor.id.clone(),
            anchor_name: anchor.name.clone(),
            content_id: item.id.clone(),
            key,
            report,
            committed_at: Utc::now(),
        })
    }

    /// Run the three independent commit steps. Returns the report and the
    /// name of the image asset if it was applied.
    async fn commit(
        &self,
        anchor: &Anchor,
        item: &ContentItem,
        key: &MatchKey,
    ) -> (CommitReport, Option<String>) {
        let label = if self.surface.set_label(anchor, key.as_str()).await {
            StepOutcome::Applied
        } else {
            StepOutcome::Failed("surface rejected label".into())
        };

        let (image, asset_name) = match self.load(self.assets.local_path_for(item)).await {
            Ok(asset) => {
                if self.surface.set_image(anchor, &asset).await {
                    (StepOutcome::Applied, Some(asset.name))
                } else {
                    (StepOutcome::Failed("surface rejected image".into()), None)
                }
            }
            Err(reason) => (StepOutcome::Failed(reason), None),
        };

        let plaque = match item.plaque_id.as_deref().map(str::trim) {
            None | Some("") => StepOutcome::Skipped,
            Some(plaque_id) => match self.load(self.assets.local_path_for_plaque(plaque_id)).await {
                Ok(asset) => {
                    if self.surface.set_plaque(anchor, &asset).await {
                        StepOutcome::Applied
                    } else {
                        StepOutcome::Failed("surface rejected plaque".into())
                    }
                }
                Err(reason) => StepOutcome::Failed(reason),
            },
        };

        (CommitReport { label, image, plaque }, asset_name)
    }

    async fn load(&self, path: Option<PathBuf>) -> Result<Asset, String> {
        let path = path.ok_or_else(|| "asset not cached".to_string())?;
        let bytes = self.assets.read(&path).await.map_err(|e| e.to_string())?;
        if bytes.is_empty() {
            return Err(format!("asset is empty: {}", path.display()));
        }
        Ok(Asset::new(asset_name(&path), bytes))
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

/// Priority items (ordered by their position in `priority_ids`) followed by
/// the rest in list order.
pub fn processing_order<'a>(
    content: &'a [ContentItem],
    priority_ids: &[ContentId],
) -> Vec<&'a ContentItem> {
    let mut rank: HashMap<&ContentId, usize> = HashMap::new();
    for (position, id) in priority_ids.iter().enumerate() {
        rank.entry(id).or_insert(position);
    }

    let (mut priority, regular): (Vec<&ContentItem>, Vec<&ContentItem>) =
        content.iter().partition(|item| rank.contains_key(&item.id));
    priority.sort_by_key(|item| rank.get(&item.id).copied().unwrap_or(usize::MAX));
    priority.extend(regular);
    priority
}

fn asset_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

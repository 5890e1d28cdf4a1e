//! Bindings and the per-step report of committing content to an anchor.

use crate::anchor::AnchorId;
use crate::content::{ContentId, MatchKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three independent sub-operations of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStep {
    Label,
    Image,
    Plaque,
}

impl std::fmt::Display for CommitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitStep::Label => write!(f, "label"),
            CommitStep::Image => write!(f, "image"),
            CommitStep::Plaque => write!(f, "plaque"),
        }
    }
}

/// Result of one commit sub-operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    Applied,
    Failed(String),
    /// Nothing to apply (e.g. the item has no plaque)
    Skipped,
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }
}

/// What happened to each sub-operation when committing one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub label: StepOutcome,
    pub image: StepOutcome,
    pub plaque: StepOutcome,
}

impl CommitReport {
    /// A commit counts as a binding if at least one step was applied.
    pub fn any_applied(&self) -> bool {
        self.label.is_applied() || self.image.is_applied() || self.plaque.is_applied()
    }

    /// Steps that failed, with their reasons (for diagnostics).
    pub fn failures(&self) -> Vec<(CommitStep, &str)> {
        [
            (CommitStep::Label, &self.label),
            (CommitStep::Image, &self.image),
            (CommitStep::Plaque, &self.plaque),
        ]
        .into_iter()
        .filter_map(|(step, outcome)| match outcome {
            StepOutcome::Failed(reason) => Some((step, reason.as_str())),
            _ => None,
        })
        .collect()
    }
}

/// A committed (anchor, content) pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub anchor_id: AnchorId,
    pub anchor_name: String,
    pub content_id: ContentId,
    pub key: MatchKey,
    pub report: CommitReport,
    pub committed_at: DateTime<Utc>,
}

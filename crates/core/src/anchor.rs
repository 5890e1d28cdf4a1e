//! Anchor domain types.
//!
//! An anchor's matching attributes are derived from its name: the tag is the
//! part before the first underscore, the orientation comes from a keyword
//! anywhere in the name (`beach_vertical` → tag `beach`, portrait).

use crate::content::Orientation;
use crate::error::ContractViolation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name fragments that mark an anchor as portrait.
pub const PORTRAIT_KEYWORDS: &[&str] = &["vertical", "portrait"];

/// Unique identifier for an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(pub String);

impl AnchorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AnchorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural flag: only placed anchors can host content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    /// A top-level anchor fixed in space
    #[default]
    Placed,
    /// A transient preview following the controller
    Preview,
}

/// A named placeholder in space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,

    /// Name carrying the tag and orientation, e.g. `forest_horizontal`
    pub name: String,

    #[serde(default)]
    pub kind: AnchorKind,

    /// Name of the image asset currently rendered on this anchor, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed_asset: Option<String>,

    /// Label text currently rendered on this anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Name of the plaque asset currently rendered on this anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaque_asset: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Anchor {
    /// Create a placed anchor with a fresh id.
    pub fn placed(name: impl Into<String>) -> Self {
        Self {
            id: AnchorId::new(),
            name: name.into(),
            kind: AnchorKind::Placed,
            displayed_asset: None,
            label: None,
            plaque_asset: None,
            created_at: Utc::now(),
        }
    }

    /// Create a preview anchor with a fresh id.
    pub fn preview(name: impl Into<String>) -> Self {
        Self {
            kind: AnchorKind::Preview,
            ..Self::placed(name)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = AnchorId(id.into());
        self
    }

    pub fn with_displayed_asset(mut self, asset: impl Into<String>) -> Self {
        self.displayed_asset = Some(asset.into());
        self
    }

    pub fn is_placed(&self) -> bool {
        self.kind == AnchorKind::Placed
    }

    /// The tag derived from the name: everything before the first underscore.
    /// A leading underscore or no underscore yields the whole name.
    pub fn tag(&self) -> &str {
        match self.name.find('_') {
            Some(idx) if idx > 0 => &self.name[..idx],
            _ => &self.name,
        }
    }

    pub fn orientation(&self) -> Orientation {
        let lower = self.name.to_lowercase();
        let portrait = PORTRAIT_KEYWORDS.iter().any(|kw| lower.contains(kw));
        Orientation::from_vertical(portrait)
    }

    /// Check the naming contract. An anchor without a name cannot be matched.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.name.trim().is_empty() {
            return Err(ContractViolation::BlankAnchorName {
                anchor_id: self.id.to_string(),
            });
        }
        Ok(())
    }
}

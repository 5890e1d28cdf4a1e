//! Content domain types: the photos that get bound to anchors.
//!
//! Content items arrive wholesale from a [`ContentSource`](crate::ContentSource)
//! on every fetch. They are never patched in place: a fetch replaces the whole
//! list.

use crate::error::ContractViolation;
use serde::{Deserialize, Serialize};

/// Stable identifier of a content item across fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Portrait or landscape. Content and anchors must agree to be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
        }
    }
}

/// The join key between content and anchors: the first tag token.
///
/// Case is preserved; comparisons against anchor tags are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchKey(String);

impl MatchKey {
    /// Wrap an already-extracted token. Returns `None` for blank input.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring containment (`tag` contains this key).
    pub fn is_contained_in(&self, tag: &str) -> bool {
        tag.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// Case-insensitive equality.
    pub fn eq_ignore_case(&self, tag: &str) -> bool {
        self.0.to_lowercase() == tag.to_lowercase()
    }
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single content item (photo) as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique, stable identifier
    pub id: ContentId,

    /// Display name (the photo's file name on the wire)
    #[serde(rename = "filename", default)]
    pub name: String,

    /// Raw, delimiter-separated tag string
    #[serde(default)]
    pub tags: String,

    /// Whether the photo is portrait
    #[serde(default)]
    pub vertical: bool,

    /// Identifier of the plaque image shown next to the photo
    #[serde(default, alias = "plaque", skip_serializing_if = "Option::is_none")]
    pub plaque_id: Option<String>,

    /// Popularity counter
    #[serde(default)]
    pub likes: u32,

    /// Remote location of the full image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Uploader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ContentItem {
    /// Minimal constructor used by sources and tests.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id: ContentId(id.into()),
            name: name.into(),
            tags: tags.into(),
            vertical: false,
            plaque_id: None,
            likes: 0,
            url: None,
            user_id: None,
        }
    }

    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn with_plaque(mut self, plaque_id: impl Into<String>) -> Self {
        self.plaque_id = Some(plaque_id.into());
        self
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_vertical(self.vertical)
    }

    /// Check the identifier contract. A blank id means upstream corruption.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.id.is_blank() {
            return Err(ContractViolation::BlankContentId {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_key_rejects_blank() {
        assert!(MatchKey::new("").is_none());
        assert!(MatchKey::new("   ").is_none());
        assert_eq!(MatchKey::new(" lake ").unwrap().as_str(), "lake");
    }

    #[test]
    fn match_key_comparisons_ignore_case() {
        let key = MatchKey::new("Beach").unwrap();
        assert!(key.is_contained_in("sunnybeachfront"));
        assert!(key.eq_ignore_case("BEACH"));
        assert!(!key.eq_ignore_case("beaches"));
    }

    #[test]
    fn content_item_deserializes_wire_shape() {
        let json = r#"{"id":"42","filename":"pier.jpg","url":"https://cdn/pier.jpg","tags":"pier, sea","user_id":"u1","likes":3}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.as_str(), "42");
        assert_eq!(item.name, "pier.jpg");
        assert_eq!(item.orientation(), Orientation::Landscape);
        assert!(item.plaque_id.is_none());
        assert_eq!(item.likes, 3);
    }

    #[test]
    fn content_item_accepts_plaque_alias() {
        let json = r#"{"id":"9","filename":"a.jpg","tags":"a","vertical":true,"plaque":"p9"}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.plaque_id.as_deref(), Some("p9"));
        assert_eq!(item.orientation(), Orientation::Portrait);
    }

    #[test]
    fn blank_id_is_a_contract_violation() {
        let item = ContentItem::new("  ", "ghost.jpg", "ghost");
        assert!(matches!(
            item.validate(),
            Err(ContractViolation::BlankContentId { .. })
        ));
        assert!(ContentItem::new("1", "a.jpg", "a").validate().is_ok());
    }
}

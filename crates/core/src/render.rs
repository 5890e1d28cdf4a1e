//! Rendering surface: the commit target for a binding.
//!
//! Every method reports success as a plain `bool`. A missing sub-component
//! (no plaque region on this anchor type, no text element) is `false`, never
//! an error.

use crate::anchor::Anchor;
use async_trait::async_trait;

/// Image bytes plus the asset name they were loaded from.
///
/// The name is what surfaces keep as "currently displayed", which lets the
/// reconstructor correlate an anchor back to its content later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Asset {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Set the label text on the anchor.
    async fn set_label(&self, anchor: &Anchor, text: &str) -> bool;

    /// Set the primary image on the anchor.
    async fn set_image(&self, anchor: &Anchor, image: &Asset) -> bool;

    /// Set the plaque image on the anchor.
    async fn set_plaque(&self, anchor: &Anchor, plaque: &Asset) -> bool;
}

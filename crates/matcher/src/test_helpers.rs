//! Shared test collaborators for matcher tests.

use anchorwall_core::anchor::{Anchor, AnchorId};
use anchorwall_core::binding::CommitStep;
use anchorwall_core::content::ContentItem;
use anchorwall_core::error::{AnchorError, AssetError, SourceError};
use anchorwall_core::render::{Asset, RenderSurface};
use anchorwall_core::source::{AssetCache, ContentSource};
use anchorwall_core::store::AnchorStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Asset cache backed by a map of file name → bytes.
///
/// Items resolve by their `name`; plaques resolve as `<plaque_id>.png`.
pub struct MapAssets {
    files: HashMap<String, Vec<u8>>,
    ready: AtomicBool,
}

impl MapAssets {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            ready: AtomicBool::new(true),
        }
    }

    pub fn with_file(mut self, name: &str, bytes: &[u8]) -> Self {
        self.files.insert(name.to_string(), bytes.to_vec());
        self
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetCache for MapAssets {
    async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn local_path_for(&self, item: &ContentItem) -> Option<PathBuf> {
        self.files.contains_key(&item.name).then(|| PathBuf::from(&item.name))
    }

    fn local_path_for_plaque(&self, plaque_id: &str) -> Option<PathBuf> {
        let name = format!("{plaque_id}.png");
        self.files.contains_key(&name).then(|| PathBuf::from(name))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path.to_string_lossy().as_ref())
            .cloned()
            .ok_or_else(|| AssetError::Read {
                path: path.display().to_string(),
                reason: "not in map".into(),
            })
    }
}

/// A render surface that records every call and can be told to fail steps.
#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Mutex<Vec<(AnchorId, CommitStep, String)>>,
    failing_steps: Mutex<HashSet<CommitStep>>,
    failing_anchors: Mutex<HashSet<AnchorId>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_step(&self, step: CommitStep) {
        self.failing_steps.lock().unwrap().insert(step);
    }

    /// Every step fails on this anchor.
    pub fn fail_anchor(&self, id: &str) {
        self.failing_anchors.lock().unwrap().insert(AnchorId::from(id));
    }

    pub fn calls_for(&self, step: CommitStep) -> Vec<(AnchorId, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s, _)| *s == step)
            .map(|(a, _, v)| (a.clone(), v.clone()))
            .collect()
    }

    fn apply(&self, anchor: &Anchor, step: CommitStep, value: &str) -> bool {
        if self.failing_steps.lock().unwrap().contains(&step)
            || self.failing_anchors.lock().unwrap().contains(&anchor.id)
        {
            return false;
        }
        self.calls
            .lock()
            .unwrap()
            .push((anchor.id.clone(), step, value.to_string()));
        true
    }
}

#[async_trait]
impl RenderSurface for RecordingSurface {
    async fn set_label(&self, anchor: &Anchor, text: &str) -> bool {
        self.apply(anchor, CommitStep::Label, text)
    }

    async fn set_image(&self, anchor: &Anchor, image: &Asset) -> bool {
        self.apply(anchor, CommitStep::Image, &image.name)
    }

    async fn set_plaque(&self, anchor: &Anchor, plaque: &Asset) -> bool {
        self.apply(anchor, CommitStep::Plaque, &plaque.name)
    }
}

/// A content source returning a swappable listing, or an error.
pub struct ScriptedSource {
    listing: Mutex<Result<Vec<ContentItem>, SourceError>>,
}

impl ScriptedSource {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            listing: Mutex::new(Ok(items)),
        }
    }

    pub fn set(&self, items: Vec<ContentItem>) {
        *self.listing.lock().unwrap() = Ok(items);
    }

    pub fn fail(&self) {
        *self.listing.lock().unwrap() = Err(SourceError::Network("connection refused".into()));
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_all(&self) -> Result<Vec<ContentItem>, SourceError> {
        self.listing.lock().unwrap().clone()
    }
}

/// An anchor store over a Vec.
#[derive(Default)]
pub struct VecAnchorStore {
    pub anchors: Mutex<Vec<Anchor>>,
}

impl VecAnchorStore {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self {
            anchors: Mutex::new(anchors),
        }
    }
}

#[async_trait]
impl AnchorStore for VecAnchorStore {
    fn name(&self) -> &str {
        "vec"
    }

    async fn list(&self) -> Result<Vec<Anchor>, AnchorError> {
        Ok(self.anchors.lock().unwrap().clone())
    }

    async fn create(&self, name: &str) -> Result<Anchor, AnchorError> {
        let anchor = Anchor::placed(name);
        self.anchors.lock().unwrap().push(anchor.clone());
        Ok(anchor)
    }

    async fn remove_last(&self) -> Result<Option<Anchor>, AnchorError> {
        Ok(self.anchors.lock().unwrap().pop())
    }

    async fn clear(&self) -> Result<usize, AnchorError> {
        let mut anchors = self.anchors.lock().unwrap();
        let n = anchors.len();
        anchors.clear();
        Ok(n)
    }
}

/// Anchors `beach_horizontal` (a1), `beach_vertical` (a2), `forest_horizontal` (a3).
pub fn scenario_anchors() -> Vec<Anchor> {
    vec![
        Anchor::placed("beach_horizontal").with_id("a1"),
        Anchor::placed("beach_vertical").with_id("a2"),
        Anchor::placed("forest_horizontal").with_id("a3"),
    ]
}

/// Items 1 and 2 tagged `beach`, item 3 tagged `forest`, all landscape and cached.
pub fn scenario_content() -> Vec<ContentItem> {
    vec![
        ContentItem::new("1", "one.jpg", "beach"),
        ContentItem::new("2", "two.jpg", "beach"),
        ContentItem::new("3", "three.jpg", "forest"),
    ]
}

pub fn scenario_assets() -> MapAssets {
    MapAssets::new()
        .with_file("one.jpg", b"1")
        .with_file("two.jpg", b"2")
        .with_file("three.jpg", b"3")
}

//! Runtime coordinator: feeds snapshots to the engine one pass at a time.
//!
//! The runtime owns the content source, the anchor store and the session
//! log. A pass lock serializes `refresh` and `anchor_created`, so at most
//! one pass touches the engine at any moment. Fetch results are taken once
//! at the start of a pass and held fixed for its duration.

use crate::catalog::AnchorCatalog;
use crate::engine::{AssignmentEngine, PassResult, SingleAnchorOutcome};
use crate::session::SessionTracker;
use anchorwall_core::anchor::Anchor;
use anchorwall_core::content::{ContentId, ContentItem};
use anchorwall_core::event::{DomainEvent, EventBus};
use anchorwall_core::source::ContentSource;
use anchorwall_core::store::AnchorStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Default)]
struct RuntimeState {
    session: SessionTracker,
    /// Last successful fetch
    snapshot: Option<Vec<ContentItem>>,
}

pub struct MatchRuntime {
    source: Arc<dyn ContentSource>,
    store: Arc<dyn AnchorStore>,
    engine: AssignmentEngine,
    events: Option<Arc<EventBus>>,
    state: Mutex<RuntimeState>,
}

impl MatchRuntime {
    pub fn new(
        source: Arc<dyn ContentSource>,
        store: Arc<dyn AnchorStore>,
        engine: AssignmentEngine,
    ) -> Self {
        Self {
            source,
            store,
            engine,
            events: None,
            state: Mutex::new(RuntimeState::default()),
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    /// Fetch content, list anchors and run one batch pass.
    pub async fn refresh(&self) -> PassResult {
        let mut state = self.state.lock().await;

        let content = match self.fetch(&mut state).await {
            Some(content) if !content.is_empty() => content,
            Some(_) => return self.skip("content listing is empty"),
            None => return self.skip("no content has been fetched yet"),
        };

        let anchors = match self.store.list().await {
            Ok(anchors) => anchors,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to list anchors");
                return self.skip(&format!("anchor store unavailable: {e}"));
            }
        };

        let priority = state.session.priority_ids();
        debug!(
            content = content.len(),
            anchors = anchors.len(),
            priority = priority.len(),
            "Starting pass"
        );

        let mut catalog = AnchorCatalog::new(anchors);
        self.engine.run_pass(&mut catalog, &content, &priority).await
    }

    /// Bind content to a freshly placed anchor.
    pub async fn anchor_created(&self, anchor: &Anchor) -> SingleAnchorOutcome {
        let mut state = self.state.lock().await;

        self.publish(DomainEvent::AnchorCreated {
            anchor_id: anchor.id.to_string(),
            name: anchor.name.clone(),
            timestamp: Utc::now(),
        });

        let content = match self.fetch(&mut state).await {
            Some(content) if !content.is_empty() => content,
            _ => return SingleAnchorOutcome::NotReady("no content available".into()),
        };

        let anchors = match self.store.list().await {
            Ok(anchors) => anchors,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to list anchors");
                return SingleAnchorOutcome::NotReady(format!("anchor store unavailable: {e}"));
            }
        };

        let session_new = state.session.priority_ids();
        self.engine
            .match_single_anchor(anchor, &anchors, &content, &session_new)
            .await
    }

    /// Ids first seen after the session baseline.
    pub async fn priority_ids(&self) -> Vec<ContentId> {
        self.state.lock().await.session.priority_ids()
    }

    /// Number of distinct content ids observed so far.
    pub async fn observed(&self) -> usize {
        self.state.lock().await.session.len()
    }

    /// Fetch and observe. A failed fetch means "no change": the previous
    /// snapshot is returned if there is one.
    async fn fetch(&self, state: &mut RuntimeState) -> Option<Vec<ContentItem>> {
        match self.source.fetch_all().await {
            Ok(items) => {
                let new_ids = state.session.observe(&items);
                if !new_ids.is_empty() {
                    info!(count = new_ids.len(), "New content arrived");
                }
                self.publish(DomainEvent::ContentObserved {
                    total: items.len(),
                    new_ids: new_ids.iter().map(|id| id.to_string()).collect(),
                    timestamp: Utc::now(),
                });
                state.snapshot = Some(items.clone());
                Some(items)
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Content fetch failed, keeping last snapshot");
                state.snapshot.clone()
            }
        }
    }

    fn skip(&self, reason: &str) -> PassResult {
        warn!(reason, "Pass skipped");
        self.publish(DomainEvent::PassSkipped {
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
        PassResult::not_ready(reason)
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

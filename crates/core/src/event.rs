//! Domain event system: decoupled observation of matching activity.
//!
//! The runtime publishes events as passes run. The CLI and tests subscribe
//! to report progress without the engine knowing who is listening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A content fetch was classified by the session tracker
    ContentObserved {
        total: usize,
        new_ids: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Content was committed to an anchor
    BindingCommitted {
        anchor_id: String,
        content_id: String,
        failed_steps: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// A match was found but every commit step failed
    CommitFailed {
        anchor_id: String,
        content_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A batch pass finished
    PassCompleted {
        hits: usize,
        misses: usize,
        commit_failures: usize,
        timestamp: DateTime<Utc>,
    },

    /// A pass was not run because a collaborator was unavailable
    PassSkipped {
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A new anchor was placed
    AnchorCreated {
        anchor_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

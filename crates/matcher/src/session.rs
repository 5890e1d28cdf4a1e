//! Session tracking: which content arrived while the process was running.
//!
//! The first non-empty fetch establishes a baseline. Anything that shows up
//! after it is "new this session" and gets priority in later passes. An
//! empty listing means the source is not ready yet and does not baseline. State is an
//! append-only log; nothing is ever pruned.

use anchorwall_core::content::{ContentId, ContentItem};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// One first-sighting record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstSeen {
    pub content_id: ContentId,
    pub first_seen: DateTime<Utc>,
    /// Seen after the baseline fetch
    pub live: bool,
}

#[derive(Debug, Default)]
pub struct SessionTracker {
    log: Vec<FirstSeen>,
    index: HashMap<ContentId, usize>,
    baselined: bool,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetch. Returns the ids seen for the first time, in list
    /// order. The first non-empty call only builds the baseline and returns
    /// nothing.
    pub fn observe(&mut self, content: &[ContentItem]) -> Vec<ContentId> {
        if !self.baselined && content.iter().all(|i| i.id.is_blank()) {
            debug!("Empty listing, session baseline deferred");
            return Vec::new();
        }
        let now = Utc::now();
        let live = self.baselined;
        let mut fresh = Vec::new();

        for item in content.iter().filter(|i| !i.id.is_blank()) {
            if self.index.contains_key(&item.id) {
                continue;
            }
            self.index.insert(item.id.clone(), self.log.len());
            self.log.push(FirstSeen {
                content_id: item.id.clone(),
                first_seen: now,
                live,
            });
            if live {
                fresh.push(item.id.clone());
            }
        }

        if !self.baselined {
            self.baselined = true;
            info!(baseline = self.log.len(), "Session baseline recorded");
        } else if !fresh.is_empty() {
            debug!(new = fresh.len(), total_new = self.priority_ids().len(), "New content this session");
        }

        fresh
    }

    /// Every id first seen after the baseline, in first-seen order.
    pub fn priority_ids(&self) -> Vec<ContentId> {
        self.log
            .iter()
            .filter(|r| r.live)
            .map(|r| r.content_id.clone())
            .collect()
    }

    pub fn first_seen(&self, id: &ContentId) -> Option<&FirstSeen> {
        self.index.get(id).and_then(|&i| self.log.get(i))
    }

    pub fn is_baselined(&self) -> bool {
        self.baselined
    }

    /// Number of distinct ids ever observed.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn log(&self) -> &[FirstSeen] {
        &self.log
    }
}

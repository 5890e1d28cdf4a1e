//! Render surface wrapper that bounds every commit step with a timeout.
//!
//! A hung surface call turns into a failed step instead of a stalled pass.

use anchorwall_core::anchor::Anchor;
use anchorwall_core::render::{Asset, RenderSurface};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub struct TimeoutSurface {
    inner: Arc<dyn RenderSurface>,
    timeout: Duration,
}

impl TimeoutSurface {
    pub fn new(inner: Arc<dyn RenderSurface>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded(&self, anchor: &Anchor, step: &str, call: impl Future<Output = bool>) -> bool {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(applied) => applied,
            Err(_) => {
                warn!(
                    anchor = %anchor.id,
                    step,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Render step timed out"
                );
                false
            }
        }
    }
}

#[async_trait]
impl RenderSurface for TimeoutSurface {
    async fn set_label(&self, anchor: &Anchor, text: &str) -> bool {
        self.bounded(anchor, "label", self.inner.set_label(anchor, text))
            .await
    }

    async fn set_image(&self, anchor: &Anchor, image: &Asset) -> bool {
        self.bounded(anchor, "image", self.inner.set_image(anchor, image))
            .await
    }

    async fn set_plaque(&self, anchor: &Anchor, plaque: &Asset) -> bool {
        self.bounded(anchor, "plaque", self.inner.set_plaque(anchor, plaque))
            .await
    }
}

//! `anchorwall watch`: Poll for content and match until Ctrl-C.

use super::pipeline;
use anchorwall_core::event::DomainEvent;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

pub async fn run(interval: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;
    let interval_secs = interval.unwrap_or(config.content.poll_interval_secs).max(1);
    let pipeline = pipeline::build(&config)?;

    println!("🧭 anchorwall — Watching every {interval_secs}s (Ctrl-C to stop)");

    // Report new arrivals and bindings as they happen
    let mut rx = pipeline.events.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event reporter fell behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event.as_ref() {
                DomainEvent::ContentObserved { new_ids, .. } if !new_ids.is_empty() => {
                    println!("  📥 New content: {}", new_ids.join(", "));
                }
                DomainEvent::BindingCommitted {
                    anchor_id,
                    content_id,
                    ..
                } => println!("  ✅ {anchor_id} ← {content_id}"),
                DomainEvent::PassSkipped { reason, .. } => println!("  ⏸  {reason}"),
                _ => {}
            }
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = pipeline.runtime.refresh().await;
                if result.is_completed() {
                    info!(
                        hits = result.hits(),
                        misses = result.misses(),
                        commit_failures = result.commit_failures(),
                        "Watch pass finished"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n👋 Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

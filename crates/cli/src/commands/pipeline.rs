//! Wiring shared by the commands that run matching.

use anchorwall_config::AppConfig;
use anchorwall_content::{ManifestStore, assets_from_config, source_from_config};
use anchorwall_core::event::EventBus;
use anchorwall_core::render::RenderSurface;
use anchorwall_matcher::{AssignmentEngine, ItemOutcome, MatchRuntime, PassResult, PassStatus, TimeoutSurface};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct Pipeline {
    pub runtime: MatchRuntime,
    pub manifest: Arc<ManifestStore>,
    pub events: Arc<EventBus>,
}

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

pub fn open_manifest(config: &AppConfig) -> Result<Arc<ManifestStore>, Box<dyn std::error::Error>> {
    let manifest = ManifestStore::open(&config.anchors.manifest)
        .map_err(|e| format!("Failed to open anchor manifest: {e}"))?;
    Ok(Arc::new(manifest))
}

/// Build the runtime from configuration.
pub fn build(config: &AppConfig) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let source = source_from_config(&config.content)?;
    let assets = Arc::new(assets_from_config(&config.assets));
    let ledger = anchorwall_ledger::from_config(&config.ledger);
    let manifest = open_manifest(config)?;
    let events = Arc::new(EventBus::default());

    let surface: Arc<dyn RenderSurface> = Arc::new(TimeoutSurface::new(
        manifest.clone(),
        Duration::from_millis(config.matcher.commit_timeout_ms),
    ));

    debug!(
        source = source.name(),
        ledger = ledger.name(),
        cache = %assets.cache_dir().display(),
        "Pipeline assembled"
    );

    let engine = AssignmentEngine::new(surface, assets, ledger).with_events(events.clone());
    let runtime = MatchRuntime::new(source, manifest.clone(), engine).with_events(events.clone());

    Ok(Pipeline {
        runtime,
        manifest,
        events,
    })
}

/// Print a pass summary and every outcome that is not a plain miss.
pub fn print_pass(result: &PassResult) {
    if let PassStatus::NotReady(reason) = &result.status {
        println!("  ⏸  Not ready: {reason}");
        return;
    }

    println!(
        "  Hits: {}   Misses: {}   Render failures: {}   Rejected: {}",
        result.hits(),
        result.misses(),
        result.commit_failures(),
        result.rejected()
    );

    for outcome in &result.outcomes {
        match outcome {
            ItemOutcome::Bound(binding) => {
                let failed: Vec<String> = binding
                    .report
                    .failures()
                    .iter()
                    .map(|(step, _)| step.to_string())
                    .collect();
                if failed.is_empty() {
                    println!("  ✅ {} ← {} ({})", binding.anchor_name, binding.content_id, binding.key);
                } else {
                    println!(
                        "  ✅ {} ← {} ({}, failed: {})",
                        binding.anchor_name,
                        binding.content_id,
                        binding.key,
                        failed.join(", ")
                    );
                }
            }
            ItemOutcome::CommitFailed {
                content_id,
                anchor_id,
                ..
            } => println!("  ❌ {anchor_id} ← {content_id} (nothing rendered)"),
            ItemOutcome::Rejected { violation } => println!("  ⚠️  {violation}"),
            ItemOutcome::Unmatchable { .. } | ItemOutcome::NoCandidate { .. } => {}
        }
    }
}

//! `anchorwall anchors`: Anchor placement and removal.

use super::pipeline;
use anchorwall_core::anchor::AnchorKind;
use anchorwall_core::store::AnchorStore;
use anchorwall_matcher::SingleAnchorOutcome;

pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;
    let manifest = pipeline::open_manifest(&config)?;
    let anchors = manifest.list().await?;

    println!("📍 Anchors ({})", anchors.len());
    println!("============");
    for anchor in &anchors {
        let kind = match anchor.kind {
            AnchorKind::Placed => "",
            AnchorKind::Preview => " [preview]",
        };
        println!(
            "  {}  {}{}  tag={} {}",
            anchor.id,
            anchor.name,
            kind,
            anchor.tag(),
            anchor.orientation()
        );
        if let Some(asset) = &anchor.displayed_asset {
            println!("      showing {asset}");
        }
    }
    Ok(())
}

pub async fn place(name: &str, preview: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;

    if preview {
        let manifest = pipeline::open_manifest(&config)?;
        let anchor = manifest.create_kind(name, AnchorKind::Preview).await?;
        println!("👁  Placed preview {} ({})", anchor.name, anchor.id);
        return Ok(());
    }

    let pipeline = pipeline::build(&config)?;
    let anchor = pipeline.manifest.create(name).await?;
    println!("📍 Placed {} ({})", anchor.name, anchor.id);

    if !config.matcher.auto_match_new_anchors {
        return Ok(());
    }

    match pipeline.runtime.anchor_created(&anchor).await {
        SingleAnchorOutcome::Bound(binding) => {
            println!("  ✅ Showing {} ({})", binding.content_id, binding.key);
        }
        SingleAnchorOutcome::NoSuitableContent => {
            println!("  No unplaced content for tag '{}'", anchor.tag());
        }
        SingleAnchorOutcome::CommitFailed { content_id, .. } => {
            println!("  ❌ Matched {content_id} but nothing could be rendered");
        }
        SingleAnchorOutcome::Ineligible => {}
        SingleAnchorOutcome::Rejected(violation) => println!("  ⚠️  {violation}"),
        SingleAnchorOutcome::NotReady(reason) => println!("  ⏸  Not matched: {reason}"),
    }
    Ok(())
}

pub async fn remove_last() -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;
    let manifest = pipeline::open_manifest(&config)?;
    let ledger = anchorwall_ledger::from_config(&config.ledger);

    match manifest.remove_last().await? {
        Some(anchor) => {
            ledger.remove(&anchor.id).await?;
            println!("🗑  Removed {} ({})", anchor.name, anchor.id);
        }
        None => println!("  No anchors to remove"),
    }
    Ok(())
}

pub async fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;
    let manifest = pipeline::open_manifest(&config)?;
    let ledger = anchorwall_ledger::from_config(&config.ledger);

    let removed = manifest.clear().await?;
    ledger.clear().await?;
    println!("🗑  Removed {removed} anchors");
    Ok(())
}

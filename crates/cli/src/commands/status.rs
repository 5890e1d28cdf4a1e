//! `anchorwall status`: Show configuration and stored state.

use super::pipeline;
use anchorwall_config::AppConfig;
use anchorwall_core::store::AnchorStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;

    println!("🧭 anchorwall Status");
    println!("====================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!(
        "  Content:      {} ({})",
        config.content.source,
        config
            .content
            .endpoint
            .as_deref()
            .unwrap_or(&config.content.path)
    );
    println!("  Poll every:   {}s", config.content.poll_interval_secs);
    println!("  Asset cache:  {}", config.assets.cache_dir);
    println!("  Plaques:      {}", config.assets.plaque_dir);
    println!("  Ledger:       {}", config.ledger.backend);
    println!("  Commit limit: {}ms", config.matcher.commit_timeout_ms);
    println!(
        "  Auto-match:   {}",
        if config.matcher.auto_match_new_anchors { "enabled" } else { "disabled" }
    );

    let manifest = pipeline::open_manifest(&config)?;
    let anchors = manifest.list().await?;
    let placed = anchors.iter().filter(|a| a.is_placed()).count();
    let showing = anchors.iter().filter(|a| a.displayed_asset.is_some()).count();
    println!("  Anchors:      {placed} placed, {showing} showing content");

    let ledger = anchorwall_ledger::from_config(&config.ledger);
    println!("  Bindings:     {} recorded", ledger.count().await?);

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `anchorwall onboard` first");
    }

    Ok(())
}

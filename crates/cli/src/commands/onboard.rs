//! `anchorwall onboard`: First-time setup.

use anchorwall_config::AppConfig;
use std::path::Path;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let defaults = AppConfig::default();

    println!("🧭 anchorwall — First-Time Setup");
    println!("================================\n");

    for dir in [config_dir.as_path(), Path::new(&defaults.assets.cache_dir), Path::new(&defaults.assets.plaque_dir)] {
        if dir.exists() {
            println!("  Directory exists: {}", dir.display());
        } else {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Point [content] at your photo listing (endpoint or path)");
        println!("   2. Place anchors: anchorwall anchors place beach_horizontal");
        println!("   3. Run: anchorwall match\n");
    }

    println!("🎉 Setup complete!\n");
    Ok(())
}

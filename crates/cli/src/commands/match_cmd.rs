//! `anchorwall match`: Run one matching pass.

use super::pipeline;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = pipeline::load_config()?;
    let pipeline = pipeline::build(&config)?;

    println!("🧭 anchorwall — Matching pass");
    println!("============================");

    let result = pipeline.runtime.refresh().await;
    pipeline::print_pass(&result);

    if !result.is_completed() {
        return Err("pass did not run".into());
    }
    Ok(())
}

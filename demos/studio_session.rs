//! Drive a composer session through the async studio facade.
//! Run with: cargo run --example studio_session

use certpress::{ComposerConfig, ExportOptions, Studio, Theme};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let studio = Studio::new(ComposerConfig::default(), Theme::classic()).await?;

    studio.set_recipient_name("Ada Lovelace").await?;
    studio.set_issuer_name("Grace Hopper").await?;

    let snapshot = studio.snapshot().await?;
    println!("draft: {}", serde_json::to_string_pretty(&snapshot)?);

    let artifact = studio
        .export(ExportOptions::default(), Some(".".into()))
        .await?;
    println!("wrote {}", artifact.filename());

    studio.close().await?;
    Ok(())
}

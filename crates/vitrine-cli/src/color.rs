use std::path::Path;

use anyhow::Context;
use vitrine_core::AppConfig;
use vitrine_media::{dominant_color_from_bytes, ColorSampler, Rgb};

/// Samples `image`. Existing local files are read directly; anything else
/// goes through the sampler (remote URL or asset path).
async fn sample(config: &AppConfig, image: &str) -> anyhow::Result<Rgb> {
    let path = Path::new(image);
    if path.is_file() {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        return tokio::task::spawn_blocking(move || dominant_color_from_bytes(&bytes))
            .await?
            .with_context(|| format!("failed to decode {image}"));
    }
    let sampler = ColorSampler::new(
        &config.assets_dir,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    sampler
        .sample(image)
        .await
        .with_context(|| format!("failed to sample {image}"))
}

pub(crate) async fn run_color(config: &AppConfig, image: &str) -> anyhow::Result<()> {
    let color = sample(config, image).await?;
    println!("{}\t{}", color.to_hex(), color.contrast());
    Ok(())
}

//! Catalog-backed commands: static page rendering and product listing.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, Utc};
use futures::future::join_all;
use vitrine_catalog::CatalogClient;
use vitrine_core::{
    checkout_destination, ActiveTags, AppConfig, Country, NotifyPreference, Product, ShopperState,
    Theme,
};
use vitrine_media::{ColorSampler, Rgb};
use vitrine_render::{cloak_links, render_page, PageView, RenderContext};

fn shopper_for(country: Country, tags: &[String]) -> ShopperState {
    ShopperState {
        country,
        tags: tags.iter().map(String::as_str).collect::<ActiveTags>(),
    }
}

async fn fetch_products(config: &AppConfig) -> anyhow::Result<Vec<Product>> {
    let client = CatalogClient::new(
        &config.catalog_source,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    client
        .fetch_products()
        .await
        .with_context(|| format!("failed to load catalog from {}", config.catalog_source))
}

/// Samples every image up front; a static page never gets a second render.
async fn sample_colors(
    config: &AppConfig,
    products: &[&Product],
) -> anyhow::Result<HashMap<String, Rgb>> {
    let sampler = ColorSampler::new(
        &config.assets_dir,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    let images: Vec<&str> = products
        .iter()
        .map(|p| p.image.as_str())
        .filter(|image| !image.is_empty())
        .collect();
    let results = join_all(images.iter().map(|image| sampler.sample(image))).await;
    for (image, result) in images.iter().zip(results) {
        if let Err(e) = result {
            tracing::debug!(image, error = %e, "color sampling failed; using default styling");
        }
    }
    Ok(sampler.snapshot())
}

/// Renders the storefront for `country` and `tags` as a standalone document.
pub(crate) async fn run_render(
    config: &AppConfig,
    country: Country,
    tags: &[String],
    light: bool,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let products = fetch_products(config).await?;
    let shopper = shopper_for(country, tags);
    let visible = shopper.visible(&products);
    let colors = sample_colors(config, &visible).await?;

    let theme = if light { Theme::Light } else { Theme::Dark };
    let page = PageView {
        shopper: &shopper,
        theme,
        notify: NotifyPreference::Off,
        products: &visible,
        toasts: &[],
        ctx: RenderContext {
            country: &shopper.country,
            checkout_path: &config.checkout_path,
            colors: &colors,
        },
        year: Utc::now().year(),
        live: false,
    };
    let html = cloak_links(&render_page(&page).context("failed to render storefront page")?);

    match out {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                products = visible.len(),
                accents = colors.len(),
                "storefront page written"
            );
        }
        None => println!("{html}"),
    }
    Ok(())
}

/// One tab-separated line per product: id, price, title, checkout destination.
pub(crate) fn product_line(product: &Product, country: &Country, checkout_path: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        product.id.as_deref().unwrap_or("-"),
        product.price_for(country).unwrap_or("-"),
        product.title,
        checkout_destination(product, country, checkout_path)
    )
}

pub(crate) async fn run_products(
    config: &AppConfig,
    country: Country,
    tags: &[String],
) -> anyhow::Result<()> {
    let products = fetch_products(config).await?;
    let shopper = shopper_for(country, tags);
    let visible = shopper.visible(&products);
    for product in &visible {
        println!(
            "{}",
            product_line(product, &shopper.country, &config.checkout_path)
        );
    }
    tracing::info!(
        total = products.len(),
        visible = visible.len(),
        country = %shopper.country,
        "products listed"
    );
    Ok(())
}

mod color;
mod offers;
mod storefront;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrine_core::{AppConfig, Country};

#[derive(Debug, Parser)]
#[command(name = "vitrine-cli")]
#[command(about = "Vitrine storefront command line interface")]
struct Cli {
    /// Catalog URL or file path, overriding VITRINE_CATALOG_SOURCE
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the storefront page as a static HTML file
    Render {
        /// Country code (e.g., BR, US); defaults to VITRINE_DEFAULT_COUNTRY
        #[arg(long)]
        country: Option<String>,
        /// Only show products carrying this tag; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Use the light theme instead of the dark default
        #[arg(long)]
        light: bool,
        /// Output file; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run offer notification cycles and print each toast
    Offers {
        #[arg(long)]
        country: Option<String>,
        /// Number of cycles to run back to back
        #[arg(long, default_value = "3")]
        cycles: usize,
        /// Keep running on the offer timer until interrupted
        #[arg(long)]
        follow: bool,
    },
    /// Print the dominant color of an image and its contrast text color
    Color {
        /// Image URL, asset path or local file
        image: String,
    },
    /// List the products visible for a country and tag selection
    Products {
        #[arg(long)]
        country: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

/// Resolves `--country`, falling back to the configured default.
fn resolve_country(raw: Option<&str>, config: &AppConfig) -> anyhow::Result<Country> {
    match raw {
        Some(code) => {
            Country::parse(code).with_context(|| format!("invalid country code {code:?}"))
        }
        None => Ok(config.default_country.clone()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut config = vitrine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(catalog) = cli.catalog {
        config.catalog_source = catalog;
    }

    match cli.command {
        Commands::Render {
            country,
            tags,
            light,
            out,
        } => {
            let country = resolve_country(country.as_deref(), &config)?;
            storefront::run_render(&config, country, &tags, light, out.as_deref()).await?;
        }
        Commands::Offers {
            country,
            cycles,
            follow,
        } => {
            let country = resolve_country(country.as_deref(), &config)?;
            if follow {
                offers::run_follow(&config, country).await?;
            } else {
                offers::run_cycles(&config, country, cycles).await?;
            }
        }
        Commands::Color { image } => color::run_color(&config, &image).await?,
        Commands::Products { country, tags } => {
            let country = resolve_country(country.as_deref(), &config)?;
            storefront::run_products(&config, country, &tags).await?;
        }
    }

    Ok(())
}

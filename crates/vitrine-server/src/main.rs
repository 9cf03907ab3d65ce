mod api;
mod middleware;
mod storefront;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vitrine_catalog::CatalogClient;
use vitrine_core::{FilePreferences, Preferences};
use vitrine_media::ColorSampler;
use vitrine_notifier::SilentChime;

use crate::{
    api::{build_app, AppState},
    storefront::Storefront,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(vitrine_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let source = Arc::new(CatalogClient::new(
        &config.catalog_source,
        config.http_timeout_secs,
        &config.user_agent,
    )?);
    let sampler = Arc::new(ColorSampler::new(
        &config.assets_dir,
        config.http_timeout_secs,
        &config.user_agent,
    )?);
    let prefs = Preferences::new(
        FilePreferences::open(&config.prefs_path),
        config.default_country.clone(),
    );

    // The browser plays the chime when the page picks up a new toast.
    let storefront = Arc::new(Storefront::new(
        Arc::clone(&config),
        prefs,
        source,
        sampler,
        Arc::new(SilentChime),
    ));
    storefront.bootstrap().await;

    let app = build_app(AppState {
        storefront: Arc::clone(&storefront),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "vitrine server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storefront.notifier().stop();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

//! The `offers` command: offer notification cycles in the terminal.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use vitrine_catalog::CatalogClient;
use vitrine_core::{AppConfig, Country};
use vitrine_notifier::{NotifierConfig, OfferNotifier, TerminalBell, Toast, ToastBoard};

fn build_notifier(config: &AppConfig, country: Country) -> anyhow::Result<OfferNotifier> {
    let source = Arc::new(CatalogClient::new(
        &config.catalog_source,
        config.http_timeout_secs,
        &config.user_agent,
    )?);
    let (_, country_rx) = watch::channel(country);
    Ok(OfferNotifier::new(
        source,
        Arc::new(ToastBoard::new(config.toast_ttl())),
        Arc::new(TerminalBell),
        country_rx,
        NotifierConfig {
            interval: config.offer_interval(),
            checkout_path: config.checkout_path.clone(),
        },
    ))
}

/// Multi-line terminal rendering of a toast.
pub(crate) fn format_toast(toast: &Toast) -> String {
    let c = &toast.content;
    format!(
        "[{id}] {title} \u{2022} {price}\n    {desc}\n    {cta}: {href}",
        id = toast.id,
        title = c.title,
        price = c.price,
        desc = c.description,
        cta = c.cta_label,
        href = c.href,
    )
}

/// Runs `cycles` offer cycles back to back.
pub(crate) async fn run_cycles(
    config: &AppConfig,
    country: Country,
    cycles: usize,
) -> anyhow::Result<()> {
    let notifier = build_notifier(config, country.clone())?;
    for _ in 0..cycles {
        let Some(toast) = notifier.run_cycle().await else {
            println!("no eligible offers for {country}");
            break;
        };
        println!("{}", format_toast(&toast));
    }
    Ok(())
}

/// Starts the offer timer and prints each new toast until ctrl-c.
pub(crate) async fn run_follow(config: &AppConfig, country: Country) -> anyhow::Result<()> {
    let notifier = build_notifier(config, country)?;
    notifier.start();

    let mut seen = HashSet::new();
    let mut poll = tokio::time::interval(Duration::from_millis(250));
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            _ = poll.tick() => {
                for toast in notifier.board().visible() {
                    if seen.insert(toast.id) {
                        println!("{}", format_toast(&toast));
                    }
                }
            }
        }
    }

    notifier.stop();
    Ok(())
}

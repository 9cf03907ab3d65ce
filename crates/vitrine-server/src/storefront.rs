//! Shared storefront state behind the HTTP handlers.
//!
//! Every mutation persists its preference (when it has one), updates the
//! in-memory view state, and leaves re-rendering to the next `render_page`.
//! Mutations that also drive the notifier do so while holding the view lock.
//! Failing to persist a preference is logged and otherwise ignored.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use vitrine_catalog::{CatalogCache, CatalogError, ProductSource};
use vitrine_core::messages::{translate_feature, translate_tag};
use vitrine_core::{
    checkout_destination, find_by_slug, resolve_list, resolve_text, AppConfig, Country, ListField,
    NotifyPreference, Preferences, Product, ShopperState, TextField, Theme,
};
use vitrine_media::{ColorSampler, Rgb};
use vitrine_notifier::{ChimePlayer, NotifierConfig, OfferNotifier, Toast, ToastBoard};
use vitrine_render::{
    cloak_links, render_checkout, render_page, render_toast_list, CheckoutView, PageView,
    RenderContext, RenderError,
};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("unknown country code: {0:?}")]
    UnknownCountry(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to render page: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone)]
struct ViewState {
    shopper: ShopperState,
    theme: Theme,
    notify: NotifyPreference,
}

/// A product resolved for one country, as served by the JSON API.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: Option<String>,
    pub title: String,
    pub image: String,
    pub price: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub features: Vec<String>,
    pub cta_text: String,
    pub checkout_url: String,
    pub accent: Option<Rgb>,
    pub accent_text: Option<&'static str>,
}

impl ProductView {
    fn resolve(
        product: &Product,
        country: &Country,
        checkout_path: &str,
        accent: Option<Rgb>,
    ) -> Self {
        let language = country.language();
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            price: product.price_for(country).map(ToOwned::to_owned),
            description: resolve_text(product, TextField::Desc, language),
            tags: resolve_list(product, ListField::Tags, language)
                .iter()
                .map(|t| translate_tag(language, t))
                .collect(),
            features: resolve_list(product, ListField::Features, language)
                .iter()
                .map(|f| translate_feature(language, f))
                .collect(),
            cta_text: resolve_text(product, TextField::CtaText, language),
            checkout_url: checkout_destination(product, country, checkout_path),
            accent,
            accent_text: accent.map(Rgb::contrast),
        }
    }
}

pub struct Storefront {
    config: Arc<AppConfig>,
    prefs: Preferences,
    view: RwLock<ViewState>,
    catalog: CatalogCache,
    sampler: Arc<ColorSampler>,
    notifier: OfferNotifier,
    country_tx: watch::Sender<Country>,
}

impl Storefront {
    /// Builds the storefront from persisted preferences. Nothing is fetched
    /// and the notifier is not started until [`Storefront::bootstrap`].
    pub fn new(
        config: Arc<AppConfig>,
        prefs: Preferences,
        source: Arc<dyn ProductSource>,
        sampler: Arc<ColorSampler>,
        chime: Arc<dyn ChimePlayer>,
    ) -> Self {
        let country = prefs.country();
        let (country_tx, country_rx) = watch::channel(country.clone());
        let board = Arc::new(ToastBoard::new(config.toast_ttl()));
        let notifier = OfferNotifier::new(
            Arc::clone(&source),
            board,
            chime,
            country_rx,
            NotifierConfig {
                interval: config.offer_interval(),
                checkout_path: config.checkout_path.clone(),
            },
        );
        let view = ViewState {
            shopper: ShopperState::new(country),
            theme: prefs.theme(),
            notify: prefs.notify(),
        };

        Self {
            config,
            prefs,
            view: RwLock::new(view),
            catalog: CatalogCache::new(source),
            sampler,
            notifier,
            country_tx,
        }
    }

    /// Loads the catalog once and applies the persisted notification preference.
    ///
    /// A failed load is logged; the page renders an empty grid until a reload
    /// succeeds.
    pub async fn bootstrap(&self) {
        if let Ok(count) = self.catalog.load().await {
            let products = self.catalog.products().await;
            self.sampler.warm(products.iter().map(|p| p.image.clone()));
            tracing::info!(count, "storefront catalog ready");
        }
        let notify = self.view.read().await.notify;
        self.notifier.apply(notify);
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn notifier(&self) -> &OfferNotifier {
        &self.notifier
    }

    pub async fn shopper(&self) -> ShopperState {
        self.view.read().await.shopper.clone()
    }

    pub async fn notify(&self) -> NotifyPreference {
        self.view.read().await.notify
    }

    /// Selects the active country. Persists it and forwards it to the notifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownCountry`] if `raw` is not a country code.
    pub async fn set_country(&self, raw: &str) -> Result<Country, StorefrontError> {
        let country =
            Country::parse(raw).ok_or_else(|| StorefrontError::UnknownCountry(raw.to_string()))?;
        let mut view = self.view.write().await;
        view.shopper.country = country.clone();
        self.country_tx.send_replace(country.clone());
        if let Err(e) = self.prefs.set_country(&country) {
            tracing::warn!(error = %e, "could not persist country preference");
        }
        drop(view);
        tracing::info!(country = %country, language = %country.language(), "country changed");
        Ok(country)
    }

    /// Flips a tag filter. Returns `true` if the tag is now active.
    pub async fn toggle_tag(&self, tag: &str) -> bool {
        let active = self.view.write().await.shopper.tags.toggle(tag);
        tracing::debug!(tag, active, "tag filter toggled");
        active
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut view = self.view.write().await;
            view.theme = view.theme.toggled();
            view.theme
        };
        if let Err(e) = self.prefs.set_theme(theme) {
            tracing::warn!(error = %e, "could not persist theme preference");
        }
        theme
    }

    /// Flips notifications on or off, starting or stopping the notifier.
    pub async fn toggle_notify(&self) -> NotifyPreference {
        let mut view = self.view.write().await;
        view.notify = view.notify.toggled();
        let notify = view.notify;
        self.notifier.apply(notify);
        if let Err(e) = self.prefs.set_notify(notify) {
            tracing::warn!(error = %e, "could not persist notification preference");
        }
        notify
    }

    /// Re-fetches the catalog. The previous snapshot survives a failure.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Catalog`] if the fetch failed.
    pub async fn reload(&self) -> Result<usize, StorefrontError> {
        let count = self.catalog.load().await?;
        let products = self.catalog.products().await;
        self.sampler.warm(products.iter().map(|p| p.image.clone()));
        Ok(count)
    }

    pub async fn is_catalog_loaded(&self) -> bool {
        self.catalog.is_loaded().await
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.notifier.board().visible()
    }

    pub fn dismiss_toast(&self, id: u64) -> bool {
        self.notifier.board().dismiss(id)
    }

    /// Visible products for the current state, resolved for the API.
    pub async fn product_views(&self) -> Vec<ProductView> {
        let shopper = self.shopper().await;
        let products = self.catalog.products().await;
        shopper
            .visible(&products)
            .into_iter()
            .map(|p| {
                ProductView::resolve(
                    p,
                    &shopper.country,
                    &self.config.checkout_path,
                    self.sampler.cached(&p.image),
                )
            })
            .collect()
    }

    /// Renders the full page for the current state with links cloaked.
    ///
    /// Images without a cached accent are queued for sampling; they pick up
    /// their color on a later render.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Render`] if the page template fails.
    pub async fn render_page(&self) -> Result<String, StorefrontError> {
        let view = self.view.read().await.clone();
        let products = self.catalog.products().await;
        let visible = view.shopper.visible(&products);
        self.sampler.warm(visible.iter().map(|p| p.image.clone()));

        let colors = self.sampler.snapshot();
        let toasts = self.toasts();
        let page = PageView {
            shopper: &view.shopper,
            theme: view.theme,
            notify: view.notify,
            products: &visible,
            toasts: &toasts,
            ctx: RenderContext {
                country: &view.shopper.country,
                checkout_path: &self.config.checkout_path,
                colors: &colors,
            },
            year: Utc::now().year(),
            live: true,
        };
        Ok(cloak_links(&render_page(&page)?))
    }

    /// Order summary for a synthesized checkout link.
    ///
    /// An unknown or missing `country` falls back to the active one; an
    /// unknown `id` renders a not-found notice.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Render`] if the checkout template fails.
    pub async fn render_checkout(
        &self,
        country: Option<&str>,
        id: Option<&str>,
    ) -> Result<String, StorefrontError> {
        let view = self.view.read().await.clone();
        let country = country
            .and_then(Country::parse)
            .unwrap_or(view.shopper.country);
        let products = self.catalog.products().await;
        let product = id.and_then(|slug| find_by_slug(&products, slug));
        let html = render_checkout(&CheckoutView {
            country: &country,
            theme: view.theme,
            product,
            accent: product.and_then(|p| self.sampler.cached(&p.image)),
        })?;
        Ok(html)
    }

    /// Visible toasts as an HTML fragment for the page's polling script.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Render`] if the toast template fails.
    pub fn render_toasts(&self) -> Result<String, StorefrontError> {
        let colors: HashMap<String, Rgb> = self.sampler.snapshot();
        let html = render_toast_list(&self.toasts(), |image| colors.get(image).copied())?;
        Ok(html)
    }
}

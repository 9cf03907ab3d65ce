use askama::Template;
use vitrine_core::messages::{t, t_format, tag_class, translate_feature, translate_tag};
use vitrine_core::{checkout_destination, resolve_list, resolve_text, ListField, Product, TextField};

use crate::{Accent, RenderContext, RenderError};

/// A tag chip: display label plus the platform class, when one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub label: String,
    pub class: Option<&'static str>,
}

/// One product resolved for a country, ready for `card.html`.
#[derive(Debug, Clone)]
pub struct CardView {
    /// Checkout destination, carried by the card and its primary action.
    pub href: String,
    pub image: String,
    pub alt: String,
    pub glyph: String,
    pub title: String,
    pub tags: Vec<TagChip>,
    /// Only present when the product has a price for the country.
    pub price: Option<String>,
    pub description: String,
    pub features: Vec<String>,
    pub cta: String,
    pub accent: Option<Accent>,
}

impl CardView {
    #[must_use]
    pub fn new(product: &Product, ctx: &RenderContext<'_>) -> Self {
        let language = ctx.language();
        let tags = resolve_list(product, ListField::Tags, language)
            .iter()
            .map(|tag| TagChip {
                label: translate_tag(language, tag),
                class: tag_class(tag),
            })
            .collect();
        let features = resolve_list(product, ListField::Features, language)
            .iter()
            .map(|f| translate_feature(language, f))
            .collect();
        let cta = resolve_text(product, TextField::CtaText, language);
        let cta = if cta.is_empty() {
            t(language, "cta.buy")
        } else {
            cta
        };

        Self {
            href: checkout_destination(product, ctx.country, ctx.checkout_path),
            image: product.image.clone(),
            alt: t_format(language, "product.imageAlt", &[("title", product.title.as_str())]),
            glyph: product.logo_glyph(),
            title: product.title.clone(),
            tags,
            price: product.price_for(ctx.country).map(ToOwned::to_owned),
            description: resolve_text(product, TextField::Desc, language),
            features,
            cta,
            accent: ctx.accent(&product.image).map(Accent::from),
        }
    }
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    card: &'a CardView,
}

#[derive(Template)]
#[template(path = "grid.html")]
struct GridTemplate {
    cards: Vec<CardView>,
}

/// Renders the product grid container with one card per product.
///
/// # Errors
///
/// Returns [`RenderError`] if the template fails to render.
pub fn render_grid(products: &[&Product], ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let cards = products.iter().map(|p| CardView::new(p, ctx)).collect();
    GridTemplate { cards }.render()
}

/// Renders one product card. The card and its primary action both carry the
/// checkout destination in `data-href`.
///
/// # Errors
///
/// Returns [`RenderError`] if the template fails to render.
pub fn render_card(product: &Product, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    CardTemplate {
        card: &CardView::new(product, ctx),
    }
    .render()
}

//! The order summary page behind synthesized checkout links.

use askama::Template;
use vitrine_core::messages::t;
use vitrine_core::{Country, Product, Theme};
use vitrine_media::Rgb;

use crate::{Accent, RenderError};

#[derive(Debug, Clone, Copy, Template)]
#[template(path = "checkout.html")]
pub struct CheckoutView<'a> {
    pub country: &'a Country,
    pub theme: Theme,
    /// `None` when the link names no known product.
    pub product: Option<&'a Product>,
    pub accent: Option<Rgb>,
}

struct Summary<'a> {
    image: &'a str,
    title: &'a str,
    price: &'a str,
    accent: Option<Accent>,
}

impl<'a> CheckoutView<'a> {
    fn lang(&self) -> &'static str {
        self.country.language().html_lang()
    }

    fn country_code(&self) -> &str {
        self.country.as_str()
    }

    fn tr(&self, key: &str) -> String {
        t(self.country.language(), key)
    }

    fn summary(&self) -> Option<Summary<'a>> {
        let product = self.product?;
        Some(Summary {
            image: &product.image,
            title: &product.title,
            price: product.price_for(self.country).unwrap_or("\u{2014}"),
            accent: self.accent.map(Accent::from),
        })
    }
}

/// Renders the checkout document for one product, or a not-found notice.
///
/// # Errors
///
/// Returns [`RenderError`] if the template fails to render.
pub fn render_checkout(view: &CheckoutView<'_>) -> Result<String, RenderError> {
    view.render()
}

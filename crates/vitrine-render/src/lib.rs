//! HTML rendering for the storefront.
//!
//! Markup lives in askama templates under `templates/`; the types here turn
//! already-resolved state into template views. Accent colors come from a
//! snapshot of the color sampler; images without a sampled color render with
//! default styling.

pub mod card;
pub mod checkout;
pub mod cloak;
pub mod page;
pub mod toast;

use std::collections::HashMap;

use vitrine_core::{Country, Language};
use vitrine_media::Rgb;

pub use askama::Error as RenderError;
pub use card::{render_card, render_grid, CardView};
pub use checkout::{render_checkout, CheckoutView};
pub use cloak::cloak_links;
pub use page::{render_page, PageView};
pub use toast::{render_toast, render_toast_list, ToastView};

/// Per-render inputs shared by cards and toasts.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub country: &'a Country,
    pub checkout_path: &'a str,
    pub colors: &'a HashMap<String, Rgb>,
}

impl RenderContext<'_> {
    #[must_use]
    pub fn language(&self) -> Language {
        self.country.language()
    }

    /// Sampled accent for `image`, if one is cached.
    #[must_use]
    pub fn accent(&self, image: &str) -> Option<Rgb> {
        self.colors.get(image).copied()
    }
}

/// Inline colors for an accented logo or button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accent {
    pub background: String,
    pub text: &'static str,
}

impl From<Rgb> for Accent {
    fn from(color: Rgb) -> Self {
        Self {
            background: color.to_hex(),
            text: color.contrast(),
        }
    }
}

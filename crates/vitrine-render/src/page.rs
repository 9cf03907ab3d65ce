use askama::Template;
use vitrine_core::messages::{t, translate_tag, FILTER_TAGS};
use vitrine_core::{Country, NotifyPreference, Product, ShopperState, Theme};
use vitrine_notifier::{Chime, Toast};

use crate::{CardView, RenderContext, RenderError, ToastView};

/// Everything needed to render the full storefront document.
///
/// Click and Enter on anything carrying `data-href` navigate there. Live
/// pages also poll the toast fragment and play the chime when a new toast
/// shows up.
#[derive(Debug, Clone, Copy, Template)]
#[template(path = "page.html")]
pub struct PageView<'a> {
    pub shopper: &'a ShopperState,
    pub theme: Theme,
    pub notify: NotifyPreference,
    /// Already filtered, in display order.
    pub products: &'a [&'a Product],
    pub toasts: &'a [Toast],
    pub ctx: RenderContext<'a>,
    pub year: i32,
    /// Served by the app (polls toasts) rather than written as a static file.
    pub live: bool,
}

struct CountryOption {
    code: &'static str,
    name: &'static str,
    selected: bool,
}

struct FilterChip {
    tag: &'static str,
    label: String,
    active: bool,
}

impl<'a> PageView<'a> {
    fn lang(&self) -> &'static str {
        self.shopper.language().html_lang()
    }

    fn country_code(&self) -> &str {
        self.shopper.country.as_str()
    }

    fn tr(&self, key: &str) -> String {
        t(self.shopper.language(), key)
    }

    fn country_options(&self) -> Vec<CountryOption> {
        ["BR", "US"]
            .into_iter()
            .filter_map(|code| Country::parse(code).map(|c| (code, c)))
            .map(|(code, c)| CountryOption {
                code,
                name: c.display_name(),
                selected: c == self.shopper.country,
            })
            .collect()
    }

    fn filter_chips(&self) -> Vec<FilterChip> {
        let language = self.shopper.language();
        FILTER_TAGS
            .into_iter()
            .map(|tag| FilterChip {
                tag,
                label: translate_tag(language, tag),
                active: self.shopper.tags.contains(tag),
            })
            .collect()
    }

    fn notify_label(&self) -> String {
        if self.notify.is_on() {
            self.tr("notify.disable")
        } else {
            self.tr("notify.enable")
        }
    }

    fn cards(&self) -> Vec<CardView> {
        self.products
            .iter()
            .map(|p| CardView::new(p, &self.ctx))
            .collect()
    }

    fn toast_views(&self) -> Vec<ToastView<'a>> {
        self.toasts
            .iter()
            .map(|toast| ToastView::new(toast, self.ctx.accent(&toast.content.image)))
            .collect()
    }

    fn chime(&self) -> String {
        chime_literal(&Chime::OFFER)
    }
}

/// The chime as a JS object literal for the page script.
fn chime_literal(chime: &Chime) -> String {
    let tones: Vec<String> = chime
        .tones
        .iter()
        .map(|t| {
            format!(
                "[{},{},{}]",
                t.frequency_hz,
                t.start.as_secs_f64(),
                t.stop.as_secs_f64()
            )
        })
        .collect();
    format!(
        "{{tones:[{}],peak:{},attack:{},release:{},floor:{}}}",
        tones.join(","),
        chime.peak_gain,
        chime.attack.as_secs_f64(),
        chime.release_end.as_secs_f64(),
        chime.floor_gain
    )
}

/// Renders the complete storefront document.
///
/// # Errors
///
/// Returns [`RenderError`] if the template fails to render.
pub fn render_page(page: &PageView<'_>) -> Result<String, RenderError> {
    page.render()
}

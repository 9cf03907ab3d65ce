use askama::Template;
use vitrine_media::Rgb;
use vitrine_notifier::{Toast, ToastContent};

use crate::{Accent, RenderError};

/// A toast plus the accent of its product image, ready for `toast.html`.
#[derive(Debug, Clone)]
pub struct ToastView<'a> {
    pub id: u64,
    pub content: &'a ToastContent,
    pub accent: Option<Accent>,
}

impl<'a> ToastView<'a> {
    #[must_use]
    pub fn new(toast: &'a Toast, accent: Option<Rgb>) -> Self {
        Self {
            id: toast.id,
            content: &toast.content,
            accent: accent.map(Accent::from),
        }
    }
}

#[derive(Template)]
#[template(path = "toast.html")]
struct ToastTemplate<'a> {
    toast: ToastView<'a>,
}

#[derive(Template)]
#[template(path = "toast_list.html")]
struct ToastListTemplate<'a> {
    toasts: Vec<ToastView<'a>>,
}

/// Renders one offer toast with its dismiss form.
///
/// # Errors
///
/// Returns [`RenderError`] if the template fails to render.
pub fn render_toast(toast: &Toast, accent: Option<Rgb>) -> Result<String, RenderError> {
    ToastTemplate {
        toast: ToastView::new(toast, accent),
    }
    .render()
}

/// Renders the visible toasts, oldest first, using cached accents by image.
///
/// # Errors
///
/// Returns [`RenderError`] if the template fails to render.
pub fn render_toast_list(
    toasts: &[Toast],
    accent: impl Fn(&str) -> Option<Rgb>,
) -> Result<String, RenderError> {
    let toasts = toasts
        .iter()
        .map(|toast| ToastView::new(toast, accent(&toast.content.image)))
        .collect();
    ToastListTemplate { toasts }.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: u64, title: &str) -> Toast {
        Toast {
            id,
            content: ToastContent {
                product_id: Some("a".to_string()),
                image: "assets/img/a.png".to_string(),
                title: title.to_string(),
                price: "R$ 9,90".to_string(),
                description: "Oferta: confira este plano com ótimo custo.".to_string(),
                cta_label: "Ver oferta".to_string(),
                close_label: "Fechar".to_string(),
                href: "checkout.html?country=BR&id=a".to_string(),
            },
        }
    }

    #[test]
    fn toast_markup() {
        let html = render_toast(&toast(7, "Plano & Cia"), None).unwrap();
        assert!(html.contains("data-toast-id=\"7\""));
        assert!(html.contains("Plano &amp; Cia \u{2022} <span class=\"price\">R$ 9,90</span>"));
        assert!(html.contains("data-href=\"checkout.html?country=BR&amp;id=a\""));
        assert!(html.contains("action=\"/toasts/7/dismiss\""));
        assert!(html.contains("aria-label=\"Fechar\""));
        assert!(html.contains(">Ver oferta</a>"));
        assert!(!html.contains("style="));
    }

    #[test]
    fn accent_applies_to_button() {
        let html = render_toast(&toast(1, "A"), Some(Rgb::new(10, 20, 30))).unwrap();
        assert!(
            html.contains("style=\"background-color:#0a141e;border-color:transparent;color:#ffffff\"")
        );
    }

    #[test]
    fn list_keeps_order() {
        let html = render_toast_list(&[toast(1, "first"), toast(2, "second")], |_| None).unwrap();
        assert!(html.find("first").unwrap() < html.find("second").unwrap());
        assert!(render_toast_list(&[], |_| None).unwrap().is_empty());
    }
}

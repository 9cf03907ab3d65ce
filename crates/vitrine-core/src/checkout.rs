use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::locale::Country;
use crate::products::Product;

/// Query value encoding that keeps RFC 3986 unreserved characters readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Lowercases `raw` and collapses every run of non-alphanumeric characters
/// into a single `-`, trimming separators from both ends.
#[must_use]
pub fn slugify(raw: &str) -> String {
    let lower = raw.to_lowercase();
    NON_SLUG_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug identifying `product` in synthesized checkout links: the product id,
/// then the title, then the literal `product`.
#[must_use]
pub fn checkout_slug(product: &Product) -> String {
    [product.id.as_deref(), Some(product.title.as_str())]
        .into_iter()
        .flatten()
        .map(slugify)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "product".to_string())
}

/// First product whose checkout slug is `slug`.
#[must_use]
pub fn find_by_slug<'a>(products: &'a [Product], slug: &str) -> Option<&'a Product> {
    let wanted = slugify(slug);
    products.iter().find(|p| checkout_slug(p) == wanted)
}

/// Where the shopper goes when activating a product in `country`.
///
/// Uses the catalog's checkout URL for the country when present; otherwise
/// synthesizes `<checkout_path>?country=<code>&id=<slug>`. The slug comes from
/// the product id, then the title, then the literal `product`.
#[must_use]
pub fn checkout_destination(product: &Product, country: &Country, checkout_path: &str) -> String {
    if let Some(url) = product.checkout_url_for(country) {
        return url.to_string();
    }

    let slug = checkout_slug(product);
    format!(
        "{checkout_path}?country={}&id={}",
        utf8_percent_encode(country.as_str(), QUERY_VALUE),
        utf8_percent_encode(&slug, QUERY_VALUE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str) -> Country {
        Country::parse(code).expect("valid country")
    }

    #[test]
    fn slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("Super Plan!"), "super-plan");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("automacao-premium"), "automacao-premium");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_drops_accented_letters_as_separators() {
        assert_eq!(slugify("Automação Premium"), "automa-o-premium");
    }

    #[test]
    fn synthesizes_destination_from_id() {
        let p = Product {
            id: Some("Super Plan!".to_string()),
            ..Product::default()
        };
        let url = checkout_destination(&p, &country("BR"), "checkout.html");
        assert!(url.contains("super-plan"), "{url}");
        assert!(url.contains("country=BR"), "{url}");
        assert!(url.starts_with("checkout.html?"), "{url}");
    }

    #[test]
    fn prefers_catalog_checkout_for_country() {
        let mut p = Product {
            id: Some("x".to_string()),
            ..Product::default()
        };
        p.checkout
            .insert("US".to_string(), "https://pay.example.com/x".to_string());
        assert_eq!(
            checkout_destination(&p, &country("US"), "checkout.html"),
            "https://pay.example.com/x"
        );
        assert_eq!(
            checkout_destination(&p, &country("BR"), "checkout.html"),
            "checkout.html?country=BR&id=x"
        );
    }

    #[test]
    fn falls_back_to_title_then_literal() {
        let titled = Product {
            id: Some("???".to_string()),
            title: "Mira Pro".to_string(),
            ..Product::default()
        };
        assert_eq!(
            checkout_destination(&titled, &country("BR"), "checkout"),
            "checkout?country=BR&id=mira-pro"
        );
        assert_eq!(
            checkout_destination(&Product::default(), &country("BR"), "checkout"),
            "checkout?country=BR&id=product"
        );
    }

    #[test]
    fn finds_product_by_checkout_slug() {
        let products = vec![
            Product {
                id: Some("Super Plan!".to_string()),
                ..Product::default()
            },
            Product {
                title: "Mira Pro".to_string(),
                ..Product::default()
            },
        ];
        assert_eq!(
            find_by_slug(&products, "super-plan").and_then(|p| p.id.as_deref()),
            Some("Super Plan!")
        );
        assert_eq!(
            find_by_slug(&products, "Mira Pro").map(|p| p.title.as_str()),
            Some("Mira Pro")
        );
        assert!(find_by_slug(&products, "missing").is_none());
    }
}

//! Country and tag filtering over the cached catalog.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::locale::{resolve_list, Country, Language, ListField};
use crate::products::Product;

/// Tag filters toggled by the shopper. Session-only, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActiveTags(BTreeSet<String>);

impl ActiveTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `tag`. Returns `true` if the tag is now active.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.0.remove(tag) {
            false
        } else {
            self.0.insert(tag.to_string());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ActiveTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// What the shopper is currently looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopperState {
    pub country: Country,
    pub tags: ActiveTags,
}

impl ShopperState {
    #[must_use]
    pub fn new(country: Country) -> Self {
        Self {
            country,
            tags: ActiveTags::new(),
        }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.country.language()
    }

    /// Products visible for this state, in catalog order.
    #[must_use]
    pub fn visible<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        apply_filters(products, &self.country, &self.tags)
    }
}

/// Keeps products sold in `country` whose resolved tags include every active tag.
///
/// Tags are resolved in the language of `country`. Input order is preserved.
#[must_use]
pub fn apply_filters<'a>(
    products: &'a [Product],
    country: &Country,
    active_tags: &ActiveTags,
) -> Vec<&'a Product> {
    let language = country.language();
    products
        .iter()
        .filter(|p| p.is_available_in(country))
        .filter(|p| {
            if active_tags.is_empty() {
                return true;
            }
            let tags = resolve_list(p, ListField::Tags, language);
            active_tags.iter().all(|t| tags.iter().any(|pt| pt == t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Localized;

    fn country(code: &str) -> Country {
        Country::parse(code).expect("valid country")
    }

    fn product(id: &str, countries: Option<&[&str]>, tags: &[&str]) -> Product {
        Product {
            id: Some(id.to_string()),
            title: id.to_string(),
            countries: countries.map(|c| c.iter().map(|s| (*s).to_string()).collect()),
            tags: Localized::new(Some(tags.iter().map(|s| (*s).to_string()).collect())),
            ..Product::default()
        }
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().filter_map(|p| p.id.clone()).collect()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("a", None, &["PC", "Mobile"]),
            product("b", Some(&["US"]), &["PC"]),
            product("c", Some(&["BR", "US"]), &["Android"]),
            product("d", Some(&["BR"]), &["PC", "Android"]),
        ]
    }

    #[test]
    fn empty_tags_returns_country_subset_in_order() {
        let products = catalog();
        let visible = apply_filters(&products, &country("BR"), &ActiveTags::new());
        assert_eq!(ids(&visible), vec!["a", "c", "d"]);
        let visible = apply_filters(&products, &country("US"), &ActiveTags::new());
        assert_eq!(ids(&visible), vec!["a", "b", "c"]);
    }

    #[test]
    fn every_active_tag_must_match() {
        let products = catalog();
        let tags: ActiveTags = ["PC", "Android"].into_iter().collect();
        let visible = apply_filters(&products, &country("BR"), &tags);
        assert_eq!(ids(&visible), vec!["d"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let products = catalog();
        let tags: ActiveTags = ["PC"].into_iter().collect();
        let once: Vec<Product> = apply_filters(&products, &country("BR"), &tags)
            .into_iter()
            .cloned()
            .collect();
        let twice = apply_filters(&once, &country("BR"), &tags);
        assert_eq!(ids(&twice), ids(&once.iter().collect::<Vec<_>>()));
        assert_eq!(
            ids(&apply_filters(&products, &country("BR"), &tags)),
            ids(&apply_filters(&products, &country("BR"), &tags))
        );
    }

    #[test]
    fn tags_are_matched_in_the_country_language() {
        let mut p = product("e", None, &["Emulador"]);
        p.tags = p
            .tags
            .with_override(Language::English, vec!["Emulator".to_string()]);
        let products = vec![p];
        let emulator: ActiveTags = ["Emulator"].into_iter().collect();
        assert_eq!(apply_filters(&products, &country("US"), &emulator).len(), 1);
        assert!(apply_filters(&products, &country("BR"), &emulator).is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut tags = ActiveTags::new();
        assert!(tags.toggle("PC"));
        assert!(tags.contains("PC"));
        assert!(!tags.toggle("PC"));
        assert!(tags.is_empty());
    }

    #[test]
    fn shopper_state_derives_language() {
        let state = ShopperState::new(country("US"));
        assert_eq!(state.language(), Language::English);
        assert_eq!(ids(&state.visible(&catalog())), vec!["a", "b", "c"]);
    }
}

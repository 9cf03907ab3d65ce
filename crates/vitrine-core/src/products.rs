use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locale::{Country, ListField, LocalizedList, LocalizedText, TextField};

/// A catalog product after normalization of the raw JSON record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier; numeric catalog ids are stringified.
    pub id: Option<String>,
    pub title: String,
    /// Image URL or asset path.
    pub image: String,
    /// Explicit logo glyph; derived from the title when absent.
    pub logo_text: Option<String>,
    /// Markets the product is sold in. `None` means every market.
    pub countries: Option<Vec<String>>,
    /// Country code to a preformatted price, e.g. `"R$ 29,90"`.
    pub prices: BTreeMap<String, String>,
    /// Country code to an explicit checkout URL.
    pub checkout: BTreeMap<String, String>,
    pub tags: LocalizedList,
    pub features: LocalizedList,
    pub desc: LocalizedText,
    pub cta_text: LocalizedText,
}

impl Product {
    /// Returns `true` if the product has no market restriction or lists `country`.
    #[must_use]
    pub fn is_available_in(&self, country: &Country) -> bool {
        self.countries
            .as_ref()
            .is_none_or(|codes| codes.iter().any(|c| c == country.as_str()))
    }

    /// Returns the non-empty price string for `country`, if any.
    #[must_use]
    pub fn price_for(&self, country: &Country) -> Option<&str> {
        self.prices
            .get(country.as_str())
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Returns the explicit checkout URL for `country`, if any.
    #[must_use]
    pub fn checkout_url_for(&self, country: &Country) -> Option<&str> {
        self.checkout
            .get(country.as_str())
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }

    /// Two-letter glyph shown in the card logo badge.
    #[must_use]
    pub fn logo_glyph(&self) -> String {
        if let Some(text) = self.logo_text.as_deref().filter(|t| !t.is_empty()) {
            return text.to_string();
        }
        let glyph: String = self.title.chars().take(2).collect::<String>().to_uppercase();
        if glyph.is_empty() {
            "PR".to_string()
        } else {
            glyph
        }
    }

    #[must_use]
    pub fn text(&self, field: TextField) -> &LocalizedText {
        match field {
            TextField::Desc => &self.desc,
            TextField::CtaText => &self.cta_text,
        }
    }

    #[must_use]
    pub fn list(&self, field: ListField) -> &LocalizedList {
        match field {
            ListField::Tags => &self.tags,
            ListField::Features => &self.features,
        }
    }
}

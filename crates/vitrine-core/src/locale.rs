//! Languages, countries, and localized product fields.
//!
//! Catalog records spell translations in several ad hoc ways (`desc_en`,
//! `descEN`, `descByLang.en`, `i18n.desc.en`, ...). The catalog loader folds
//! all of them into a [`Localized`] value once, so everything downstream
//! resolves a field with a plain map lookup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::products::Product;

/// Storefront language. Portuguese is primary, English secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// `US` is the only market served in English.
    #[must_use]
    pub fn for_country(country: &Country) -> Self {
        if country.as_str() == "US" {
            Language::English
        } else {
            Language::Portuguese
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::Portuguese => "pt",
            Language::English => "en",
        }
    }

    /// Value for the document `lang` attribute.
    #[must_use]
    pub fn html_lang(self) -> &'static str {
        match self {
            Language::Portuguese => "pt-br",
            Language::English => "en",
        }
    }

    /// Catalog suffixes that carry this language, most specific first.
    #[must_use]
    pub fn catalog_variants(self) -> &'static [&'static str] {
        match self {
            Language::Portuguese => &["br", "pt"],
            Language::English => &["en"],
        }
    }

    pub const ALL: [Language; 2] = [Language::Portuguese, Language::English];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Upper-case market code such as `BR` or `US`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    /// Accepts two or three ASCII letters in any case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        let valid = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
        valid.then(|| Country(code.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn language(&self) -> Language {
        Language::for_country(self)
    }

    /// Flag asset shown in the country picker.
    #[must_use]
    pub fn flag_path(&self) -> &'static str {
        if self.0 == "US" {
            "assets/flags/us.svg"
        } else {
            "assets/flags/br.svg"
        }
    }

    /// Label shown next to the flag in the country picker.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        if self.0 == "US" {
            "Estados Unidos"
        } else {
            "Brasil"
        }
    }
}

impl Default for Country {
    fn default() -> Self {
        Country("BR".to_string())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field with one primary (untranslated) value and per-language overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub primary: Option<T>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<Language, T>,
}

pub type LocalizedText = Localized<String>;
pub type LocalizedList = Localized<Vec<String>>;

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self {
            primary: None,
            overrides: BTreeMap::new(),
        }
    }
}

impl<T> Localized<T> {
    #[must_use]
    pub fn new(primary: Option<T>) -> Self {
        Self {
            primary,
            overrides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_override(mut self, language: Language, value: T) -> Self {
        self.overrides.insert(language, value);
        self
    }

    #[must_use]
    pub fn translation(&self, language: Language) -> Option<&T> {
        self.overrides.get(&language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Desc,
    CtaText,
}

impl TextField {
    /// Base field name in the catalog JSON.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            TextField::Desc => "desc",
            TextField::CtaText => "ctaText",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Tags,
    Features,
}

impl ListField {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ListField::Tags => "tags",
            ListField::Features => "features",
        }
    }
}

/// Resolves a text field for `language`.
///
/// Order: catalog translation, built-in description table (`desc` only),
/// primary value. English never falls back to the primary call-to-action,
/// which is written in Portuguese.
#[must_use]
pub fn resolve_text(product: &Product, field: TextField, language: Language) -> String {
    let value = product.text(field);
    if let Some(translated) = value.translation(language) {
        return translated.clone();
    }

    if field == TextField::Desc {
        if let Some(builtin) = product
            .id
            .as_deref()
            .and_then(|id| builtin_description(id, language))
        {
            return builtin.to_string();
        }
    }

    if field == TextField::CtaText && language == Language::English {
        return String::new();
    }

    value.primary.clone().unwrap_or_default()
}

/// Resolves a list field for `language`, falling back to the primary list.
#[must_use]
pub fn resolve_list(product: &Product, field: ListField, language: Language) -> Vec<String> {
    let value = product.list(field);
    value
        .translation(language)
        .or(value.primary.as_ref())
        .cloned()
        .unwrap_or_default()
}

fn builtin_description(id: &str, language: Language) -> Option<&'static str> {
    let (pt, en) = match id {
        "1" => (
            "Dashboard completo para gestão de acessos e relatórios.",
            "Complete dashboard for access management and reporting.",
        ),
        "automacao-premium" => (
            "Ferramentas para automatizar tarefas legítimas com eficiência.",
            "Tools to automate legitimate tasks efficiently.",
        ),
        "consultoria" => (
            "Ajuda personalizada para configurar seu painel e serviço.",
            "Personalized help to set up your panel and service.",
        ),
        _ => return None,
    };
    Some(match language {
        Language::Portuguese => pt,
        Language::English => en,
    })
}

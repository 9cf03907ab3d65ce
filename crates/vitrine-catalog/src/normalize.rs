//! Normalization from raw catalog JSON to [`vitrine_core::Product`].
//!
//! Catalog authors spell translations several ways. For a field such as
//! `desc`, the English override may live in `desc_en`, `descEN`, `descEn`,
//! `descByLang.en`, `descI18n.en` or `i18n.desc.en`. All of them are folded
//! into a [`Localized`] value here; sibling fields win over nested
//! dictionaries, and only the first dictionary present is consulted.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use vitrine_core::{Language, ListField, Localized, Product, TextField};

type Object = Map<String, Value>;

/// Normalizes a whole catalog document.
///
/// A document that is not a JSON array yields an empty catalog. Entries that
/// are not objects are skipped.
#[must_use]
pub fn normalize_catalog(doc: &Value) -> Vec<Product> {
    let Some(entries) = doc.as_array() else {
        tracing::warn!("catalog document is not a JSON array; treating as empty");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry.as_object() {
            Some(obj) => Some(normalize_product(obj)),
            None => {
                tracing::warn!(index, "skipping catalog entry that is not an object");
                None
            }
        })
        .collect()
}

/// Normalizes one raw product record. Mistyped fields degrade to empty values.
#[must_use]
pub fn normalize_product(obj: &Object) -> Product {
    Product {
        id: obj.get("id").and_then(scalar_string).filter(|s| !s.is_empty()),
        title: string_field(obj, "title").unwrap_or_default(),
        image: string_field(obj, "image").unwrap_or_default(),
        logo_text: string_field(obj, "logoText").filter(|s| !s.trim().is_empty()),
        countries: obj.get("countries").and_then(Value::as_array).map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        }),
        prices: string_map(obj.get("prices"), scalar_string),
        checkout: string_map(obj.get("checkout"), |v| v.as_str().map(str::to_string)),
        tags: localized_list(obj, ListField::Tags.key()),
        features: localized_list(obj, ListField::Features.key()),
        desc: localized_text(obj, TextField::Desc.key()),
        cta_text: localized_text(obj, TextField::CtaText.key()),
    }
}

fn string_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Strings pass through; numbers are stringified.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_map(
    value: Option<&Value>,
    convert: fn(&Value) -> Option<String>,
) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| convert(v).map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_default()
}

fn valid_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn valid_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Sibling field names carrying `variant` for `key`, e.g. `desc_en`, `descEN`, `descEn`.
fn sibling_keys(key: &str, variant: &str) -> [String; 3] {
    let mut chars = variant.chars();
    let capitalized = chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default();
    [
        format!("{key}_{variant}"),
        format!("{key}{}", variant.to_ascii_uppercase()),
        format!("{key}{capitalized}"),
    ]
}

/// The first nested per-language dictionary present for `key`.
fn language_dict<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(&format!("{key}ByLang"))
        .and_then(Value::as_object)
        .or_else(|| obj.get(&format!("{key}I18n")).and_then(Value::as_object))
        .or_else(|| {
            obj.get("i18n")
                .and_then(Value::as_object)
                .and_then(|i18n| i18n.get(key))
                .and_then(Value::as_object)
        })
}

fn override_for<T>(
    obj: &Object,
    key: &str,
    language: Language,
    validate: fn(&Value) -> Option<T>,
) -> Option<T> {
    let variants = language.catalog_variants();

    let from_siblings = variants.iter().find_map(|variant| {
        sibling_keys(key, variant)
            .iter()
            .filter_map(|k| obj.get(k))
            .find_map(validate)
    });
    if from_siblings.is_some() {
        return from_siblings;
    }

    let dict = language_dict(obj, key)?;
    variants
        .iter()
        .filter_map(|variant| dict.get(*variant))
        .find_map(validate)
}

fn localized<T>(
    obj: &Object,
    key: &str,
    primary: Option<T>,
    validate: fn(&Value) -> Option<T>,
) -> Localized<T> {
    Language::ALL
        .into_iter()
        .fold(Localized::new(primary), |acc, language| {
            match override_for(obj, key, language, validate) {
                Some(value) => acc.with_override(language, value),
                None => acc,
            }
        })
}

fn localized_text(obj: &Object, key: &str) -> Localized<String> {
    localized(obj, key, string_field(obj, key), valid_text)
}

fn localized_list(obj: &Object, key: &str) -> Localized<Vec<String>> {
    let primary = obj.get(key).and_then(Value::as_array).map(|arr| {
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });
    localized(obj, key, primary, valid_list)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

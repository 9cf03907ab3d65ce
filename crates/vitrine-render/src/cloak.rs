//! Link cloaking.
//!
//! Rewrites outbound anchors so the visible `href` is `#` and the real
//! destination moves to `data-href`, where the page script picks it up on
//! click. This only hides URLs from casual view; it does not restrict
//! navigation.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a(\s[^>]*)?>(.*?)</a\s*>").expect("valid anchor regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const SKIPPED_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

#[derive(Debug)]
struct Attr {
    name: String,
    value: Option<String>,
}

impl Attr {
    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn parse_attrs(raw: &str) -> Vec<Attr> {
    ATTR_RE
        .captures_iter(raw)
        .map(|c| Attr {
            name: c[1].to_string(),
            value: c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .map(|m| m.as_str().to_string()),
        })
        .collect()
}

fn should_cloak(attrs: &[Attr]) -> Option<String> {
    let opted_out = attrs
        .iter()
        .any(|a| a.is("data-cloak") && a.value.as_deref() == Some("false"));
    if opted_out {
        return None;
    }
    let href = attrs.iter().find(|a| a.is("href"))?.value.clone()?;
    let lower = href.trim_start().to_ascii_lowercase();
    if href.is_empty()
        || lower.starts_with('#')
        || SKIPPED_SCHEMES.iter().any(|s| lower.starts_with(s))
    {
        return None;
    }
    Some(href)
}

fn aria_label(inner_html: &str) -> String {
    let text = TAG_RE.replace_all(inner_html, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        "Abrir link".to_string()
    } else {
        text.replace('"', "&quot;")
    }
}

fn cloak_anchor(caps: &Captures<'_>) -> String {
    let raw_attrs = caps.get(1).map_or("", |m| m.as_str());
    let inner = &caps[2];
    let mut attrs = parse_attrs(raw_attrs);

    let Some(href) = should_cloak(&attrs) else {
        return caps[0].to_string();
    };

    for attr in &mut attrs {
        if attr.is("href") {
            attr.value = Some("#".to_string());
        }
    }
    if !attrs.iter().any(|a| a.is("data-href")) {
        attrs.push(Attr {
            name: "data-href".to_string(),
            value: Some(href),
        });
    }
    if !attrs.iter().any(|a| a.is("role")) {
        attrs.push(Attr {
            name: "role".to_string(),
            value: Some("button".to_string()),
        });
    }
    let label = aria_label(inner);
    match attrs.iter_mut().find(|a| a.is("aria-label")) {
        Some(existing) => existing.value = Some(label),
        None => attrs.push(Attr {
            name: "aria-label".to_string(),
            value: Some(label),
        }),
    }

    let rendered: String = attrs
        .iter()
        .map(|a| match &a.value {
            Some(v) => format!(" {}=\"{}\"", a.name, v.replace('"', "&quot;")),
            None => format!(" {}", a.name),
        })
        .collect();
    format!("<a{rendered}>{inner}</a>")
}

/// Cloaks every eligible `<a href>` in `html`.
///
/// Anchors are left alone when they opt out with `data-cloak="false"` or when
/// their `href` is empty, a fragment, or a `mailto:`, `tel:` or
/// `javascript:` link. An existing `data-href` is never overwritten.
#[must_use]
pub fn cloak_links(html: &str) -> String {
    ANCHOR_RE
        .replace_all(html, |caps: &Captures<'_>| cloak_anchor(caps))
        .into_owned()
}

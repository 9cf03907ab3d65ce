use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses a localized price string such as `"R$ 29,90"` or `"$19.99"`.
///
/// Everything except digits, `,` and `.` is stripped. When the remainder has a
/// comma but no period, the first comma is the decimal separator. The longest
/// leading `digits[.digits]` prefix is then parsed, so `"1.234,56"` reads as
/// `1.234`. Values beyond `Decimal`'s range saturate instead of failing.
/// Returns `None` when no digits survive.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned = cleaned.replacen(',', ".", 1);
    }

    let mut seen_point = false;
    let prefix: String = cleaned
        .chars()
        .take_while(|c| {
            if c.is_ascii_digit() {
                true
            } else if *c == '.' && !seen_point {
                seen_point = true;
                true
            } else {
                false
            }
        })
        .collect();

    if !prefix.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let normalized = match (prefix.starts_with('.'), prefix.ends_with('.')) {
        (true, _) => format!("0{prefix}"),
        (false, true) => prefix.trim_end_matches('.').to_string(),
        (false, false) => prefix,
    };
    Some(Decimal::from_str(&normalized).unwrap_or_else(|_| saturate(&normalized)))
}

/// Drops fractional digits until the number fits, clamping to `Decimal::MAX`
/// when the integer part alone overflows.
fn saturate(number: &str) -> Decimal {
    let (int, frac) = number.split_once('.').unwrap_or((number, ""));
    (0..frac.len())
        .rev()
        .find_map(|keep| Decimal::from_str(&format!("{int}.{}", &frac[..=keep])).ok())
        .or_else(|| Decimal::from_str(int).ok())
        .unwrap_or(Decimal::MAX)
}

/// Sort key for price ordering: unparsable prices sort after every real one.
#[must_use]
pub fn price_sort_key(raw: &str) -> Decimal {
    parse_price(raw).unwrap_or(Decimal::MAX)
}

use vitrine_core::{parse_price, price_sort_key, Country, Product};

/// Offers rotate across this many of the cheapest products.
pub const OFFER_POOL_SIZE: usize = 3;

/// The cheapest products sold in `country` that carry a price for it.
///
/// Products with an unparsable price are only considered when no product
/// has a parseable one. Ties keep catalog order.
#[must_use]
pub fn cheapest_offers<'a>(products: &'a [Product], country: &Country) -> Vec<&'a Product> {
    let priced: Vec<(&Product, &str)> = products
        .iter()
        .filter(|p| p.is_available_in(country))
        .filter_map(|p| p.price_for(country).map(|price| (p, price)))
        .collect();

    let any_parseable = priced.iter().any(|(_, price)| parse_price(price).is_some());
    let mut candidates: Vec<(&Product, &str)> = priced
        .into_iter()
        .filter(|(_, price)| !any_parseable || parse_price(price).is_some())
        .collect();
    candidates.sort_by_key(|(_, price)| price_sort_key(price));

    candidates
        .into_iter()
        .take(OFFER_POOL_SIZE)
        .map(|(p, _)| p)
        .collect()
}

/// Rotating position within the offer pool. Starts before the first entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferRotation {
    last: Option<usize>,
}

impl OfferRotation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances modulo `len`. Returns `None` (and does not move) when `len` is 0.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = self.last.map_or(0, |last| (last + 1) % len);
        self.last = Some(next);
        Some(next)
    }
}

/// Picks the next offer for `country`, advancing `rotation`.
pub fn pick_offer<'a>(
    rotation: &mut OfferRotation,
    products: &'a [Product],
    country: &Country,
) -> Option<&'a Product> {
    let pool = cheapest_offers(products, country);
    rotation.advance(pool.len()).map(|i| pool[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, br: &str) -> Product {
        let mut p = Product {
            id: Some(id.to_string()),
            title: id.to_string(),
            ..Product::default()
        };
        p.prices.insert("BR".to_string(), br.to_string());
        p
    }

    fn br() -> Country {
        Country::parse("BR").unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().filter_map(|p| p.id.clone()).collect()
    }

    #[test]
    fn cheapest_three_in_price_order() {
        let products = vec![
            priced("e", "R$ 99,00"),
            priced("a", "R$ 9,90"),
            priced("d", "R$ 59,90"),
            priced("b", "R$ 19,90"),
            priced("c", "R$ 29,90"),
        ];
        assert_eq!(ids(&cheapest_offers(&products, &br())), vec!["a", "b", "c"]);
    }

    #[test]
    fn unpriced_and_unavailable_are_excluded() {
        let mut hidden = priced("hidden", "R$ 1,00");
        hidden.countries = Some(vec!["US".to_string()]);
        let products = vec![hidden, Product::default(), priced("x", "R$ 5,00")];
        assert_eq!(ids(&cheapest_offers(&products, &br())), vec!["x"]);
    }

    #[test]
    fn unparsable_prices_never_beat_parseable_ones() {
        let products = vec![
            priced("free", "Grátis"),
            priced("ask", "Sob consulta"),
            priced("pricey", "R$ 999,00"),
        ];
        assert_eq!(ids(&cheapest_offers(&products, &br())), vec!["pricey"]);
    }

    #[test]
    fn huge_prices_still_count_as_parseable() {
        let products = vec![
            priced("ask", "Sob consulta"),
            priced("huge", "R$ 123456789012345678901234567890,00"),
            priced("cheap", "R$ 9,90"),
        ];
        assert_eq!(ids(&cheapest_offers(&products, &br())), vec!["cheap", "huge"]);
    }

    #[test]
    fn unparsable_prices_used_when_nothing_parses() {
        let products = vec![priced("free", "Grátis"), priced("ask", "Sob consulta")];
        assert_eq!(ids(&cheapest_offers(&products, &br())), vec!["free", "ask"]);
    }

    #[test]
    fn rotation_starts_at_zero_and_wraps() {
        let mut rotation = OfferRotation::new();
        let seen: Vec<_> = (0..4).filter_map(|_| rotation.advance(3)).collect();
        assert_eq!(seen, vec![0, 1, 2, 0]);
        assert_eq!(rotation.advance(0), None);
        assert_eq!(rotation.advance(3), Some(1));
    }

    #[test]
    fn rotation_adapts_to_smaller_pool() {
        let mut rotation = OfferRotation::new();
        rotation.advance(3);
        rotation.advance(3);
        assert_eq!(rotation.advance(2), Some(0));
    }

    #[test]
    fn pick_offer_cycles_through_pool() {
        let products = vec![
            priced("a", "R$ 1,00"),
            priced("b", "R$ 2,00"),
            priced("c", "R$ 3,00"),
            priced("d", "R$ 4,00"),
        ];
        let mut rotation = OfferRotation::new();
        let picks: Vec<_> = (0..3)
            .filter_map(|_| pick_offer(&mut rotation, &products, &br()))
            .filter_map(|p| p.id.clone())
            .collect();
        assert_eq!(picks, vec!["a", "b", "c"]);
    }
}

use serde::{Deserialize, Serialize};

/// A price observation for a storefront product.
///
/// Prices are carried as integer cents — the storefront API's native unit —
/// so comparisons between ticks are exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Current price in cents. `None` when the product has no sale pricing
    /// (free, unreleased, or delisted).
    pub price_cents: Option<u64>,
    /// Active discount, 0–100. Always 0 when `price_cents` is `None`.
    pub discount_percent: u8,
    /// Product display name.
    pub name: String,
}

impl PriceQuote {
    /// A quote for a product with no current price data.
    pub fn unpriced(name: impl Into<String>) -> Self {
        Self {
            price_cents: None,
            discount_percent: 0,
            name: name.into(),
        }
    }
}

/// Render a cents amount as a decimal string with two fraction digits,
/// e.g. `1999` → `"19.99"`.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_cents_two_fraction_digits() {
        assert_eq!(format_cents(1999), "19.99");
        assert_eq!(format_cents(500), "5.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(123456), "1234.56");
    }

    #[test]
    fn unpriced_quote_has_no_discount() {
        let q = PriceQuote::unpriced("Some Game");
        assert!(q.price_cents.is_none());
        assert_eq!(q.discount_percent, 0);
        assert_eq!(q.name, "Some Game");
    }

    #[test]
    fn quote_serde_roundtrip() {
        let q = PriceQuote {
            price_cents: Some(1499),
            discount_percent: 40,
            name: "Another Game".into(),
        };
        let json = serde_json::to_string(&q).unwrap();
        let restored: PriceQuote = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, q);
    }
}

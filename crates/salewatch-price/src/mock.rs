//! Mock price lookup for deterministic testing.
//!
//! Returns scripted per-product outcomes without making any HTTP calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::{PriceError, PriceLookup};
use salewatch_core::PriceQuote;

/// A mock price lookup that replays scripted outcomes per product id.
///
/// Each `fetch` pops the next scripted outcome for that product; when the
/// script runs dry the product reports `UnknownProduct`. Requests are
/// recorded for assertions.
///
/// # Example
/// ```
/// use salewatch_core::PriceQuote;
/// use salewatch_price::mock::MockPriceLookup;
/// let lookup = MockPriceLookup::new().with_quote(
///     "10",
///     PriceQuote { price_cents: Some(1999), discount_percent: 20, name: "Game".into() },
/// );
/// ```
#[derive(Default)]
pub struct MockPriceLookup {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Result<PriceQuote, PriceError>>>>>,
    /// Product ids fetched, in order (for assertions in tests).
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockPriceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful quote for `product_id`.
    pub fn with_quote(self, product_id: &str, quote: PriceQuote) -> Self {
        self.push_quote(product_id, quote);
        self
    }

    /// Script a lookup failure for `product_id`.
    pub fn with_error(self, product_id: &str, error: PriceError) -> Self {
        self.push_error(product_id, error);
        self
    }

    /// Append a successful quote to a product's script (multi-tick tests).
    pub fn push_quote(&self, product_id: &str, quote: PriceQuote) {
        self.scripts
            .lock()
            .unwrap()
            .entry(product_id.to_string())
            .or_default()
            .push_back(Ok(quote));
    }

    /// Append a failure to a product's script.
    pub fn push_error(&self, product_id: &str, error: PriceError) {
        self.scripts
            .lock()
            .unwrap()
            .entry(product_id.to_string())
            .or_default()
            .push_back(Err(error));
    }
}

#[async_trait]
impl PriceLookup for MockPriceLookup {
    async fn fetch(&self, product_id: &str) -> Result<PriceQuote, PriceError> {
        self.requests.lock().unwrap().push(product_id.to_string());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(product_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(PriceError::UnknownProduct(product_id.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order_then_runs_dry() {
        let lookup = MockPriceLookup::new()
            .with_quote(
                "10",
                PriceQuote {
                    price_cents: Some(1999),
                    discount_percent: 20,
                    name: "Game".into(),
                },
            )
            .with_error("10", PriceError::Timeout);

        assert_eq!(lookup.fetch("10").await.unwrap().price_cents, Some(1999));
        assert_eq!(lookup.fetch("10").await, Err(PriceError::Timeout));
        assert_eq!(
            lookup.fetch("10").await,
            Err(PriceError::UnknownProduct("10".into()))
        );
        assert_eq!(lookup.requests.lock().unwrap().len(), 3);
    }
}

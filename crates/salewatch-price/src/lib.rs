//! # salewatch-price
//!
//! Price lookup against the storefront pricing API. The [`PriceLookup`]
//! trait is the seam the reconciliation loop depends on; the HTTP
//! implementation lives in [`storefront`], a scripted mock for tests in
//! [`mock`].

pub mod mock;
pub mod storefront;

use async_trait::async_trait;
use thiserror::Error;

pub use salewatch_core::PriceQuote;
pub use storefront::StorefrontClient;

/// Why a price lookup produced no quote.
///
/// A product that exists but has no sale pricing is NOT an error — that is
/// `Ok` with `price_cents: None`. Errors mean the lookup itself failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("http error: {0}")]
    Http(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unknown product: {0}")]
    UnknownProduct(String),
}

/// Fetches current pricing for a single product.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn fetch(&self, product_id: &str) -> Result<PriceQuote, PriceError>;
}

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::{PriceError, PriceLookup};
use salewatch_core::PriceQuote;

/// HTTP client for the storefront's `appdetails` pricing endpoint.
///
/// The response body is JSON keyed by the queried id, with
/// `data.price_overview.{final, discount_percent}` (final is integer cents)
/// and `data.name`. A product without a `price_overview` block has no
/// current sale pricing.
pub struct StorefrontClient {
    client: reqwest::Client,
    api_base: String,
}

impl StorefrontClient {
    pub fn new(api_base: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl PriceLookup for StorefrontClient {
    async fn fetch(&self, product_id: &str) -> Result<PriceQuote, PriceError> {
        let url = format!("{}/appdetails", self.api_base);

        let resp = self
            .client
            .get(&url)
            .query(&[("appids", product_id)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PriceError::Timeout
                } else {
                    PriceError::Http(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(PriceError::Http(format!("status {}", resp.status())));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| PriceError::MalformedResponse(e.to_string()))?;

        let quote = parse_appdetails(product_id, &body)?;
        debug!(product = product_id, price = ?quote.price_cents, discount = quote.discount_percent, "fetched quote");
        Ok(quote)
    }
}

/// Parse one product's entry out of an `appdetails` response body.
pub fn parse_appdetails(product_id: &str, body: &Value) -> Result<PriceQuote, PriceError> {
    let entry = body
        .get(product_id)
        .ok_or_else(|| PriceError::MalformedResponse(format!("no entry for {product_id}")))?;

    if !entry["success"].as_bool().unwrap_or(false) {
        return Err(PriceError::UnknownProduct(product_id.to_string()));
    }

    let data = entry
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| PriceError::MalformedResponse("success entry without data".into()))?;

    let name = data["name"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| fallback_name(product_id));

    let Some(overview) = data.get("price_overview") else {
        // Free, unreleased, or otherwise unpriced — not an error.
        return Ok(PriceQuote::unpriced(name));
    };

    let price_cents = overview["final"]
        .as_u64()
        .ok_or_else(|| PriceError::MalformedResponse("price_overview without final".into()))?;
    let discount_percent = overview["discount_percent"].as_u64().unwrap_or(0).min(100) as u8;

    Ok(PriceQuote {
        price_cents: Some(price_cents),
        discount_percent,
        name,
    })
}

/// Display label for a product whose real name could not be obtained.
pub fn fallback_name(product_id: &str) -> String {
    format!("AppID {product_id}")
}

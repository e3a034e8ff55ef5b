//! # Price-tracking reconciliation loop
//!
//! A timer-driven background task. Each tick makes one full pass over the
//! tracked-products table: fetch the current quote, compare against the last
//! observed price, emit a sale alert when a discounted price drops (or is
//! seen for the first time), then persist all observations in one batched
//! write. Lookup failures degrade to "no data this tick" — a flaky endpoint
//! or a bad product id never halts the pass.
//!
//! Shutdown is honored at tick boundaries: a pass that has started runs to
//! completion before the loop exits.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};

use parking_lot::RwLock;
use salewatch_channels::mention;
use salewatch_config::SalewatchConfig;
use salewatch_core::format_cents;
use salewatch_price::PriceLookup;
use salewatch_store::{TrackedStore, WishlistManager};

/// A discount worth announcing, produced by one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleAlert {
    pub product_id: String,
    pub name: String,
    pub price_cents: u64,
    pub discount_percent: u8,
    /// Users whose wishlist contains the product, in user-id order. May be
    /// empty — the alert is announced regardless.
    pub watchers: Vec<String>,
}

impl SaleAlert {
    /// Render the announcement text for a channel type.
    pub fn render(&self, channel_type: &str) -> String {
        let mut text = format!(
            "🔥 **SALE ALERT!** `{}` is now ${} ({}% off)",
            self.name,
            format_cents(self.price_cents),
            self.discount_percent
        );
        if !self.watchers.is_empty() {
            text.push('\n');
            let mentions: Vec<String> = self
                .watchers
                .iter()
                .map(|u| mention(channel_type, u))
                .collect();
            text.push_str(&mentions.join(" "));
        }
        text
    }
}

/// The reconciliation loop over tracked products.
pub struct PriceTracker {
    wishlists: WishlistManager,
    tracked: Arc<Mutex<TrackedStore>>,
    lookup: Arc<dyn PriceLookup>,
}

impl PriceTracker {
    pub fn new(wishlists: WishlistManager, lookup: Arc<dyn PriceLookup>) -> Self {
        let tracked = wishlists.tracked();
        Self {
            wishlists,
            tracked,
            lookup,
        }
    }

    /// One full pass over the tracked table. Returns the alerts to announce;
    /// observed prices are persisted in a single batched write at the end.
    pub async fn scan_once(&self) -> Vec<SaleAlert> {
        let tracked = self.tracked.lock().await.snapshot();
        let wishlists = self.wishlists.snapshot().await;

        debug!(products = tracked.len(), "scanning tracked products");

        let mut alerts = Vec::new();
        let mut observed: BTreeMap<String, u64> = BTreeMap::new();

        for (product_id, record) in &tracked {
            let quote = match self.lookup.fetch(product_id).await {
                Ok(q) => q,
                Err(e) => {
                    warn!(product = %product_id, error = %e, "price lookup failed, skipping this tick");
                    continue;
                }
            };

            let Some(price) = quote.price_cents else {
                debug!(product = %product_id, "no price data this tick");
                continue;
            };
            observed.insert(product_id.clone(), price);

            // Announce iff discounted AND (first observation OR strictly
            // below the last observed price). Flat or rising prices stay
            // quiet even while discounted.
            let dropped = record.last_price.is_none_or(|last| price < last);
            if quote.discount_percent > 0 && dropped {
                let watchers: Vec<String> = wishlists
                    .iter()
                    .filter(|(_, products)| products.iter().any(|p| p == product_id))
                    .map(|(user_id, _)| user_id.clone())
                    .collect();
                info!(
                    product = %product_id,
                    price = %format_cents(price),
                    discount = quote.discount_percent,
                    watchers = watchers.len(),
                    "sale detected"
                );
                alerts.push(SaleAlert {
                    product_id: product_id.clone(),
                    name: quote.name,
                    price_cents: price,
                    discount_percent: quote.discount_percent,
                    watchers,
                });
            }
        }

        if let Err(e) = self.tracked.lock().await.record_prices(&observed) {
            warn!(error = %e, "failed to persist observed prices");
        }

        alerts
    }

    /// Run the loop until shutdown: scan, emit alerts, sleep, repeat. The
    /// poll interval is re-read from the shared config each tick so
    /// hot-reloads take effect on the next cycle.
    pub async fn run(
        self,
        config: Arc<RwLock<SalewatchConfig>>,
        alert_tx: mpsc::Sender<SaleAlert>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!("price tracker started");

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            // Scanning phase — runs to completion even if shutdown arrives
            // mid-pass.
            let alerts = self.scan_once().await;
            for alert in alerts {
                if alert_tx.send(alert).await.is_err() {
                    info!("alert channel closed, stopping price tracker");
                    return;
                }
            }

            // Idle phase — wait out the poll interval or leave on shutdown.
            let interval =
                std::time::Duration::from_secs(config.read().bot.poll_interval_secs.max(1));
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("price tracker stopped");
    }
}

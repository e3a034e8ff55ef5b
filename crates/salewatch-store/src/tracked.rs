use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::kv::JsonStore;
use salewatch_core::Result;

/// Persisted record for a product the bot polls. Products are registered the
/// first time any user wishes for them and are never removed, even after
/// every wishlist drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedProduct {
    /// Last price observed, in cents. `None` until the first priced tick.
    pub last_price: Option<u64>,
}

/// The tracked-products table, backed by `tracked.json`.
#[derive(Debug, Clone)]
pub struct TrackedStore {
    store: JsonStore,
}

impl TrackedStore {
    pub fn open(dir: &Path) -> Self {
        Self {
            store: JsonStore::open(dir, "tracked"),
        }
    }

    /// Register a product for tracking with no observed price yet. Returns
    /// `true` when the product was newly registered, `false` when it was
    /// already tracked. Persists immediately on insert.
    pub fn register(&self, product_id: &str) -> Result<bool> {
        let mut map = self.store.load_or_default::<TrackedProduct>();
        if map.contains_key(product_id) {
            return Ok(false);
        }
        map.insert(product_id.to_string(), TrackedProduct { last_price: None });
        self.store.save(&map)?;
        debug!(product = product_id, "registered product for tracking");
        Ok(true)
    }

    /// Snapshot of all tracked products, in key order.
    pub fn snapshot(&self) -> BTreeMap<String, TrackedProduct> {
        self.store.load_or_default()
    }

    /// Apply one scan pass's observed prices as a single batched write.
    ///
    /// The table is re-read before merging so products registered while the
    /// scan was fetching are not lost; only the scanned products' last_price
    /// fields are touched.
    pub fn record_prices(&self, observed: &BTreeMap<String, u64>) -> Result<()> {
        if observed.is_empty() {
            return Ok(());
        }
        let mut map = self.store.load_or_default::<TrackedProduct>();
        for (product_id, cents) in observed {
            map.entry(product_id.clone())
                .or_insert(TrackedProduct { last_price: None })
                .last_price = Some(*cents);
        }
        self.store.save(&map)
    }

    /// The raw JSON store (tests and maintenance tooling).
    pub fn raw(&self) -> &JsonStore {
        &self.store
    }
}

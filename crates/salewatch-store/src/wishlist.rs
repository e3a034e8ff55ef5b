use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::kv::JsonStore;
use crate::tracked::TrackedStore;
use salewatch_core::Result;

/// Outcome of adding a product to a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Outcome of removing a product from a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Per-user wishlists, backed by `wishlists.json`.
///
/// Each mutating operation runs its whole load-mutate-save sequence inside
/// the store's mutex, so a command handler and the price tracker can never
/// interleave half-applied writes. The tracked-products store has its own
/// mutex, shared with the tracker via [`WishlistManager::tracked`].
#[derive(Clone)]
pub struct WishlistManager {
    wishlists: Arc<Mutex<JsonStore>>,
    tracked: Arc<Mutex<TrackedStore>>,
}

impl WishlistManager {
    /// Open both stores under `dir`.
    pub fn open(dir: &Path) -> Self {
        Self::with_shared_tracked(dir, Arc::new(Mutex::new(TrackedStore::open(dir))))
    }

    /// Open the wishlist store under `dir`, sharing an existing
    /// tracked-products handle.
    pub fn with_shared_tracked(dir: &Path, tracked: Arc<Mutex<TrackedStore>>) -> Self {
        Self {
            wishlists: Arc::new(Mutex::new(JsonStore::open(dir, "wishlists"))),
            tracked,
        }
    }

    /// Handle to the tracked-products store, for the reconciliation loop.
    pub fn tracked(&self) -> Arc<Mutex<TrackedStore>> {
        Arc::clone(&self.tracked)
    }

    /// Add a product to a user's wishlist. Idempotent: a second add of the
    /// same product reports `AlreadyPresent` and changes nothing. On a first
    /// add the product is also registered for price tracking.
    ///
    /// The two stores persist independently, wishlist first; when the
    /// tracked-store write fails the wishlist keeps the entry and the error
    /// propagates to the caller.
    pub async fn add(&self, user_id: &str, product_id: &str) -> Result<AddOutcome> {
        {
            let store = self.wishlists.lock().await;
            let mut map: BTreeMap<String, Vec<String>> = store.load_or_default();
            let entry = map.entry(user_id.to_string()).or_default();
            if entry.iter().any(|p| p == product_id) {
                return Ok(AddOutcome::AlreadyPresent);
            }
            entry.push(product_id.to_string());
            store.save(&map)?;
        }

        if self.tracked.lock().await.register(product_id)? {
            info!(product = product_id, "now tracking product");
        }
        Ok(AddOutcome::Added)
    }

    /// Remove a product from a user's wishlist. The product stays in the
    /// tracked-products table.
    pub async fn remove(&self, user_id: &str, product_id: &str) -> Result<RemoveOutcome> {
        let store = self.wishlists.lock().await;
        let mut map: BTreeMap<String, Vec<String>> = store.load_or_default();
        let Some(list) = map.get_mut(user_id) else {
            return Ok(RemoveOutcome::NotFound);
        };
        if !list.iter().any(|p| p == product_id) {
            return Ok(RemoveOutcome::NotFound);
        }
        list.retain(|p| p != product_id);
        store.save(&map)?;
        Ok(RemoveOutcome::Removed)
    }

    /// A user's wishlist in insertion order; empty when the user has none.
    pub async fn list(&self, user_id: &str) -> Vec<String> {
        let store = self.wishlists.lock().await;
        let map: BTreeMap<String, Vec<String>> = store.load_or_default();
        map.get(user_id).cloned().unwrap_or_default()
    }

    /// All wishlists, keyed by user id.
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.wishlists.lock().await.load_or_default()
    }

    /// The users whose wishlist contains `product_id`, in user-id order.
    pub async fn watchers_of(&self, product_id: &str) -> Vec<String> {
        let map = self.snapshot().await;
        map.into_iter()
            .filter(|(_, products)| products.iter().any(|p| p == product_id))
            .map(|(user_id, _)| user_id)
            .collect()
    }
}

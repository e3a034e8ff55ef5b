#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salewatch_core::PriceQuote;
    use salewatch_price::mock::MockPriceLookup;
    use salewatch_price::PriceError;
    use salewatch_runtime::PriceTracker;
    use salewatch_store::WishlistManager;

    fn quote(cents: u64, discount: u8, name: &str) -> PriceQuote {
        PriceQuote {
            price_cents: Some(cents),
            discount_percent: discount,
            name: name.into(),
        }
    }

    async fn last_price(wl: &WishlistManager, product: &str) -> Option<u64> {
        wl.tracked()
            .lock()
            .await
            .snapshot()
            .get(product)
            .unwrap()
            .last_price
    }

    // ── The notification state machine, tick by tick ───────────

    #[tokio::test]
    async fn first_observation_with_discount_notifies_then_records_price() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("u1", "10").await.unwrap();

        let lookup = MockPriceLookup::new().with_quote("10", quote(1999, 20, "Half-Life"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        let alerts = tracker.scan_once().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].product_id, "10");
        assert_eq!(alerts[0].price_cents, 1999);
        assert_eq!(alerts[0].discount_percent, 20);
        assert_eq!(last_price(&wl, "10").await, Some(1999));
    }

    #[tokio::test]
    async fn unchanged_price_does_not_renotify() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("u1", "10").await.unwrap();

        let lookup = MockPriceLookup::new()
            .with_quote("10", quote(1999, 20, "Half-Life"))
            .with_quote("10", quote(1999, 20, "Half-Life"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        assert_eq!(tracker.scan_once().await.len(), 1);
        // Same price, still discounted — not strictly below last_price.
        assert!(tracker.scan_once().await.is_empty());
        assert_eq!(last_price(&wl, "10").await, Some(1999));
    }

    #[tokio::test]
    async fn deeper_drop_notifies_again() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("u1", "10").await.unwrap();

        let lookup = MockPriceLookup::new()
            .with_quote("10", quote(1999, 20, "Half-Life"))
            .with_quote("10", quote(1499, 40, "Half-Life"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        assert_eq!(tracker.scan_once().await.len(), 1);
        let alerts = tracker.scan_once().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].price_cents, 1499);
        assert_eq!(alerts[0].discount_percent, 40);
        assert_eq!(last_price(&wl, "10").await, Some(1499));
    }

    #[tokio::test]
    async fn zero_discount_never_notifies_even_on_a_drop() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("u1", "10").await.unwrap();

        let lookup = MockPriceLookup::new()
            .with_quote("10", quote(1499, 40, "Half-Life"))
            .with_quote("10", quote(1499, 0, "Half-Life"))
            .with_quote("10", quote(999, 0, "Half-Life"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        assert_eq!(tracker.scan_once().await.len(), 1);
        // Discount ended, price flat.
        assert!(tracker.scan_once().await.is_empty());
        assert_eq!(last_price(&wl, "10").await, Some(1499));
        // Price dropped further but with no active discount.
        assert!(tracker.scan_once().await.is_empty());
        assert_eq!(last_price(&wl, "10").await, Some(999));
    }

    #[tokio::test]
    async fn lookup_failure_skips_product_and_continues_pass() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("u1", "10").await.unwrap();
        wl.add("u1", "20").await.unwrap();

        // Seed a last price for "10" so we can see it survive the failure.
        {
            let tracked = wl.tracked();
            let guard = tracked.lock().await;
            guard
                .record_prices(&std::collections::BTreeMap::from([(
                    "10".to_string(),
                    1999u64,
                )]))
                .unwrap();
        }

        let lookup = MockPriceLookup::new()
            .with_error("10", PriceError::Http("connection refused".into()))
            .with_quote("20", quote(500, 50, "Bargain Bin"));
        let requests = Arc::clone(&lookup.requests);
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        let alerts = tracker.scan_once().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].product_id, "20");
        // The failed product kept its last price and the pass still covered
        // the whole table.
        assert_eq!(last_price(&wl, "10").await, Some(1999));
        assert_eq!(*requests.lock().unwrap(), vec!["10", "20"]);
    }

    #[tokio::test]
    async fn unpriced_product_leaves_last_price_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("u1", "70").await.unwrap();

        let lookup = MockPriceLookup::new().with_quote("70", PriceQuote::unpriced("Free Game"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        assert!(tracker.scan_once().await.is_empty());
        assert_eq!(last_price(&wl, "70").await, None);
    }

    // ── Watchers ───────────────────────────────────────────────

    #[tokio::test]
    async fn alert_carries_exactly_the_watching_users() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("zoe", "10").await.unwrap();
        wl.add("adam", "10").await.unwrap();
        wl.add("mia", "99").await.unwrap();

        let lookup = MockPriceLookup::new()
            .with_quote("10", quote(1999, 20, "Half-Life"))
            .with_quote("99", quote(5000, 0, "Full Price"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        let alerts = tracker.scan_once().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].watchers, vec!["adam", "zoe"]);
    }

    #[tokio::test]
    async fn alert_fires_even_with_no_watchers() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        // Register then un-wish: the product stays tracked.
        wl.add("u1", "10").await.unwrap();
        wl.remove("u1", "10").await.unwrap();

        let lookup = MockPriceLookup::new().with_quote("10", quote(1999, 20, "Half-Life"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        let alerts = tracker.scan_once().await;
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].watchers.is_empty());
    }

    // ── Rendering ──────────────────────────────────────────────

    #[tokio::test]
    async fn rendered_alert_mentions_watchers() {
        let dir = tempfile::tempdir().unwrap();
        let wl = WishlistManager::open(dir.path());
        wl.add("111", "10").await.unwrap();
        wl.add("222", "10").await.unwrap();

        let lookup = MockPriceLookup::new().with_quote("10", quote(1999, 20, "Half-Life"));
        let tracker = PriceTracker::new(wl.clone(), Arc::new(lookup));

        let alerts = tracker.scan_once().await;
        let text = alerts[0].render("discord");
        assert!(text.contains("`Half-Life` is now $19.99 (20% off)"));
        assert!(text.contains("<@111>"));
        assert!(text.contains("<@222>"));
    }
}

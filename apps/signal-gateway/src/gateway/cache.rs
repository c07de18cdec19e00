//! Market data cache.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::MarketDataSnapshot;

/// Latest snapshot per subscribed symbol, overwritten in place on each push.
#[derive(Debug, Default)]
pub struct MarketDataCache {
    snapshots: RwLock<HashMap<String, MarketDataSnapshot>>,
}

impl MarketDataCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the entry for the snapshot's symbol.
    pub fn update(&self, snapshot: MarketDataSnapshot) {
        if let Ok(mut snapshots) = self.snapshots.write() {
            snapshots.insert(snapshot.symbol.clone(), snapshot);
        }
    }

    /// Latest snapshot for a symbol, if any push has been seen.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<MarketDataSnapshot> {
        self.snapshots
            .read()
            .ok()
            .and_then(|snapshots| snapshots.get(symbol).cloned())
    }

    /// Symbols with cached data.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VenueTick;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_push_then_read_round_trip() {
        let cache = MarketDataCache::new();

        let before = Utc::now();
        let tick = VenueTick {
            symbol: "ESH5".to_string(),
            last_price: Some(dec!(4510.25)),
            bid: Some(dec!(4510.00)),
            ask: Some(dec!(4510.50)),
            volume: Some(1_250_000),
            ..Default::default()
        };
        cache.update(tick.into_snapshot());

        let snapshot = cache.get("ESH5").unwrap();
        assert_eq!(snapshot.last_price, dec!(4510.25));
        assert_eq!(snapshot.bid, dec!(4510.00));
        assert_eq!(snapshot.ask, dec!(4510.50));
        assert_eq!(snapshot.volume, 1_250_000);
        assert!(snapshot.timestamp >= before);
    }

    #[test]
    fn test_update_overwrites_in_place() {
        let cache = MarketDataCache::new();
        for price in [dec!(4500), dec!(4501)] {
            cache.update(
                VenueTick {
                    symbol: "ESH5".to_string(),
                    last_price: Some(price),
                    ..Default::default()
                }
                .into_snapshot(),
            );
        }

        assert_eq!(cache.symbols().len(), 1);
        assert_eq!(cache.get("ESH5").unwrap().last_price, dec!(4501));
    }

    #[test]
    fn test_unknown_symbol_is_none() {
        let cache = MarketDataCache::new();
        assert!(cache.get("NQH5").is_none());
    }
}

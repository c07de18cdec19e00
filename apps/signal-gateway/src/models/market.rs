//! Market data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest quote/trade snapshot for a subscribed symbol.
///
/// One entry per symbol, overwritten in place on each venue push; no history
/// is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    /// Contract symbol.
    pub symbol: String,
    /// Last trade price.
    pub last_price: Decimal,
    /// Best bid price.
    pub bid: Decimal,
    /// Best ask price.
    pub ask: Decimal,
    /// Best bid size.
    pub bid_size: u32,
    /// Best ask size.
    pub ask_size: u32,
    /// Session volume.
    pub volume: u64,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Session open.
    pub open: Decimal,
    /// Snapshot timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Raw market data push from the venue.
///
/// Venues deliver sparse updates; every field except the symbol is optional
/// and missing fields default to zero in the translated snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueTick {
    /// Contract symbol.
    pub symbol: String,
    /// Last trade price.
    pub last_price: Option<Decimal>,
    /// Best bid price.
    pub bid: Option<Decimal>,
    /// Best ask price.
    pub ask: Option<Decimal>,
    /// Best bid size.
    pub bid_size: Option<u32>,
    /// Best ask size.
    pub ask_size: Option<u32>,
    /// Session volume.
    pub volume: Option<u64>,
    /// Session high.
    pub high: Option<Decimal>,
    /// Session low.
    pub low: Option<Decimal>,
    /// Session open.
    pub open: Option<Decimal>,
}

impl VenueTick {
    /// Translate into a snapshot, stamping the current time.
    #[must_use]
    pub fn into_snapshot(self) -> MarketDataSnapshot {
        MarketDataSnapshot {
            symbol: self.symbol,
            last_price: self.last_price.unwrap_or_default(),
            bid: self.bid.unwrap_or_default(),
            ask: self.ask.unwrap_or_default(),
            bid_size: self.bid_size.unwrap_or_default(),
            ask_size: self.ask_size.unwrap_or_default(),
            volume: self.volume.unwrap_or_default(),
            high: self.high.unwrap_or_default(),
            low: self.low.unwrap_or_default(),
            open: self.open.unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }
}

//! Position ledger.
//!
//! One entry per symbol; refreshed wholesale from venue queries and updated
//! incrementally by local fill events.

use std::collections::HashMap;
use std::sync::RwLock;

use rust_decimal::Decimal;

use crate::models::{OrderSide, Position};

/// Symbol-keyed position store.
#[derive(Debug, Default)]
pub struct PositionLedger {
    positions: RwLock<HashMap<String, Position>>,
}

impl PositionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ledger with an authoritative venue snapshot.
    ///
    /// The snapshot wins wholesale; entries absent from it are dropped, not
    /// merged.
    pub fn replace_all(&self, positions: Vec<Position>) {
        if let Ok(mut guard) = self.positions.write() {
            *guard = positions
                .into_iter()
                .map(|p| (p.symbol.clone(), p))
                .collect();
        }
    }

    /// Get the position for a symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<Position> {
        self.positions
            .read()
            .ok()
            .and_then(|positions| positions.get(symbol).cloned())
    }

    /// All positions.
    #[must_use]
    pub fn all(&self) -> Vec<Position> {
        self.positions
            .read()
            .map(|positions| positions.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Symbols with a ledger entry.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.positions
            .read()
            .map(|positions| positions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.positions.read().map(|p| p.len()).unwrap_or(0)
    }

    /// Apply a local fill to the position for `symbol`.
    ///
    /// Opens, adds to, reduces, or reverses the net position; reducing fills
    /// realize PnL against the average entry price. The entry is removed
    /// when the position returns to flat. Returns the resulting position
    /// (flat entries are returned with zero quantity before removal so
    /// observers see the transition).
    #[must_use]
    pub fn apply_fill(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: u32,
        price: Decimal,
    ) -> Option<Position> {
        if quantity == 0 {
            return None;
        }
        let mut positions = self.positions.write().ok()?;
        let position = positions
            .entry(symbol.to_string())
            .or_insert_with(|| Position::new(symbol));

        let delta = match side {
            OrderSide::Buy => i64::from(quantity),
            OrderSide::Sell => -i64::from(quantity),
        };
        let old_qty = position.quantity;
        let new_qty = old_qty + delta;

        if old_qty == 0 {
            position.avg_price = price;
        } else if old_qty.signum() == delta.signum() {
            // Adding to the position: volume-weighted entry price.
            let old_cost = Decimal::from(old_qty.abs()) * position.avg_price;
            let add_cost = Decimal::from(delta.abs()) * price;
            position.avg_price = (old_cost + add_cost) / Decimal::from(old_qty.abs() + delta.abs());
        } else {
            // Reducing or reversing: realize PnL on the closed portion.
            let closed = delta.abs().min(old_qty.abs());
            let per_contract = if old_qty > 0 {
                price - position.avg_price
            } else {
                position.avg_price - price
            };
            position.realized_pnl += per_contract * Decimal::from(closed);

            if new_qty != 0 && new_qty.signum() != old_qty.signum() {
                position.avg_price = price;
            }
        }

        position.quantity = new_qty;
        let result = position.clone();
        if new_qty == 0 {
            positions.remove(symbol);
        }
        Some(result)
    }
}

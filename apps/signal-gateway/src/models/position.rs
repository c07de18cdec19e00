//! Position types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net position in a single symbol.
///
/// Quantity is signed: positive = long, negative = short, zero = flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Contract symbol.
    pub symbol: String,
    /// Net quantity in contracts.
    pub quantity: i64,
    /// Volume-weighted average entry price.
    pub avg_price: Decimal,
    /// Unrealized PnL.
    pub unrealized_pnl: Decimal,
    /// Realized PnL from closed quantity.
    pub realized_pnl: Decimal,
}

impl Position {
    /// Create an empty (flat) position.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: 0,
            avg_price: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
        }
    }

    /// Check if the position is flat.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    /// Absolute position size in contracts.
    #[must_use]
    pub const fn abs_quantity(&self) -> u32 {
        self.quantity.unsigned_abs() as u32
    }
}

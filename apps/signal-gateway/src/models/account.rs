//! Account information types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Position;

/// Account snapshot, rebuilt wholesale on each venue query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account identifier.
    pub account_id: String,
    /// Cash balance.
    pub balance: Decimal,
    /// Available buying power.
    pub buying_power: Decimal,
    /// Daily PnL. Feeds the risk gate's daily-loss check.
    pub daily_pnl: Decimal,
    /// Unrealized PnL across positions.
    pub unrealized_pnl: Decimal,
    /// Realized PnL.
    pub realized_pnl: Decimal,
    /// Positions snapshot at query time.
    pub positions: Vec<Position>,
}

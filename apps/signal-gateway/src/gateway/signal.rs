//! Trading signal types from the strategy system.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::models::Order;

/// Recognized signal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    /// Enter a long position.
    Long,
    /// Enter a short position.
    Short,
    /// Exit the named position and clean up open orders.
    Exit,
}

impl FromStr for SignalKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LONG" => Ok(Self::Long),
            "SHORT" => Ok(Self::Short),
            "EXIT" => Ok(Self::Exit),
            other => Err(GatewayError::InvalidSignal(other.to_string())),
        }
    }
}

/// A signal command from the strategy system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRequest {
    /// Signal type string as sent by the strategy system.
    pub signal_type: String,
    /// Contract symbol.
    pub symbol: String,
    /// Number of contracts for entry signals.
    pub contracts: u32,
    /// Protective stop price, placed after a successful entry.
    pub stop_loss: Option<Decimal>,
}

/// What a signal execution actually did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalOutcome {
    /// The parsed signal kind.
    pub kind: SignalKind,
    /// Entry order, when the signal was LONG/SHORT and the entry went
    /// through risk gate and venue.
    pub entry: Option<Order>,
    /// Protective stop order, when a stop price was supplied and the entry
    /// succeeded.
    pub protective: Option<Order>,
    /// For EXIT: whether the close and cleanup both succeeded.
    pub exited: bool,
}

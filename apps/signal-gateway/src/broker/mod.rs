//! Broker venue integration.
//!
//! The venue is an opaque remote service reached through the narrow
//! [`BrokerAdapter`] capability interface: connect, subscribe, submit-order,
//! cancel-order, query-positions, query-account. The coordinator never sees
//! a wire protocol; adapters own that entirely.

mod mock;
mod paper;
mod symbology;

pub use mock::MockBroker;
pub use paper::PaperBroker;
pub use symbology::VenueSymbology;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OrderKind, OrderSide};

/// Errors from venue operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BrokerError {
    /// Could not establish or maintain the venue session.
    #[error("connection error: {0}")]
    Connection(String),

    /// Venue rejected or failed an order operation.
    #[error("order error: {0}")]
    Order(String),

    /// Venue rejected a market data subscription.
    #[error("subscription error: {0}")]
    Subscription(String),

    /// Venue query (positions, account) failed.
    #[error("query error: {0}")]
    Query(String),

    /// The adapter's venue symbology table is missing a domain variant.
    #[error("incomplete venue symbology: {0}")]
    IncompleteSymbology(String),
}

/// Order specification in venue terms, produced from an accepted draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueOrderSpec {
    /// Contract symbol.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Quantity in contracts (post risk-gate clamp).
    pub quantity: u32,
    /// Order kind.
    pub kind: OrderKind,
    /// Limit price (if applicable).
    pub limit_price: Option<Decimal>,
    /// Stop price (if applicable).
    pub stop_price: Option<Decimal>,
}

/// Submission acknowledgement from the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueAck {
    /// Venue-assigned order ID.
    pub order_id: String,
    /// Acknowledgement status string as reported by the venue.
    pub ack_status: String,
}

/// Position as reported by the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenuePosition {
    /// Contract symbol.
    pub symbol: String,
    /// Signed net quantity.
    pub quantity: i64,
    /// Average entry price.
    pub avg_price: Decimal,
    /// Unrealized PnL.
    pub unrealized_pnl: Decimal,
    /// Realized PnL.
    pub realized_pnl: Decimal,
}

/// Account summary as reported by the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueAccount {
    /// Account identifier.
    pub account_id: String,
    /// Cash balance.
    pub balance: Decimal,
    /// Buying power.
    pub buying_power: Decimal,
    /// Daily PnL.
    pub daily_pnl: Decimal,
    /// Unrealized PnL.
    pub unrealized_pnl: Decimal,
    /// Realized PnL.
    pub realized_pnl: Decimal,
}

/// Fill report pushed by the venue against a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueExecution {
    /// Venue order ID the fill applies to.
    pub order_id: String,
    /// Contract symbol.
    pub symbol: String,
    /// Side of the filled order.
    pub side: OrderSide,
    /// Quantity of this execution.
    pub fill_quantity: u32,
    /// Price of this execution.
    pub fill_price: Decimal,
}

/// Capability interface to the broker venue.
///
/// All calls may suspend and may fail; the coordinator catches every error
/// and converts it into its own result contracts rather than propagating raw
/// venue failures.
#[async_trait]
pub trait BrokerAdapter: Send + Sync {
    /// Establish the venue session.
    async fn connect(&self) -> Result<(), BrokerError>;

    /// Tear down the venue session.
    async fn disconnect(&self) -> Result<(), BrokerError>;

    /// Subscribe to market data for a symbol.
    async fn subscribe(&self, symbol: &str) -> Result<(), BrokerError>;

    /// Submit an order.
    async fn submit_order(&self, spec: &VenueOrderSpec) -> Result<VenueAck, BrokerError>;

    /// Cancel a single order by venue ID.
    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError>;

    /// Cancel all open orders.
    async fn cancel_all_orders(&self) -> Result<(), BrokerError>;

    /// Query current positions.
    async fn get_positions(&self) -> Result<Vec<VenuePosition>, BrokerError>;

    /// Query account information.
    async fn get_account(&self) -> Result<VenueAccount, BrokerError>;

    /// Lightweight session health check, used by the liveness monitor.
    async fn health_check(&self) -> Result<(), BrokerError>;

    /// Venue name for logging.
    fn venue_name(&self) -> &'static str;
}

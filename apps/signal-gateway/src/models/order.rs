//! Order-related types for execution tracking.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl OrderSide {
    /// All sides, for venue mapping completeness checks.
    pub const ALL: [Self; 2] = [Self::Buy, Self::Sell];

    /// The side that reduces a position opened on this side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order kind (market, limit, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// Market order - execute at best available price.
    Market,
    /// Limit order - execute at specified price or better.
    Limit,
    /// Stop order - becomes market order when stop price is reached.
    Stop,
    /// Stop-limit order - becomes limit order when stop price is reached.
    StopLimit,
}

impl OrderKind {
    /// All kinds, for venue mapping completeness checks.
    pub const ALL: [Self; 4] = [Self::Market, Self::Limit, Self::Stop, Self::StopLimit];

    /// Whether this kind requires a limit price.
    #[must_use]
    pub const fn requires_limit_price(&self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }

    /// Whether this kind requires a stop price.
    #[must_use]
    pub const fn requires_stop_price(&self) -> bool {
        matches!(self, Self::Stop | Self::StopLimit)
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Stop => write!(f, "STOP"),
            Self::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// Order status in the lifecycle.
///
/// `Pending -> Submitted -> {Filled | PartiallyFilled -> Filled | Cancelled | Rejected}`.
/// `PartiallyFilled` may also transition to `Cancelled` (cancel of the residual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created but not yet acknowledged by the venue.
    Pending,
    /// Order acknowledged by the venue.
    Submitted,
    /// Order partially filled.
    PartiallyFilled,
    /// Order completely filled.
    Filled,
    /// Order cancelled.
    Cancelled,
    /// Order rejected by the venue (or the venue call failed).
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Rejected)
    }

    /// Returns true if the order is still open (can be filled or cancelled).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Submitted | Self::PartiallyFilled)
    }
}

/// A request to place an order, before the venue has seen it.
///
/// Drafts are what the risk gate evaluates; quantity may be clamped before
/// submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Contract symbol (e.g. "ESH5").
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Requested quantity in contracts.
    pub quantity: u32,
    /// Order kind.
    pub kind: OrderKind,
    /// Limit price (required for LIMIT and STOP_LIMIT).
    pub limit_price: Option<Decimal>,
    /// Stop price (required for STOP and STOP_LIMIT).
    pub stop_price: Option<Decimal>,
}

impl OrderDraft {
    /// Create a market order draft.
    #[must_use]
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: u32) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Market,
            limit_price: None,
            stop_price: None,
        }
    }

    /// Create a stop order draft.
    #[must_use]
    pub fn stop(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: u32,
        stop_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Stop,
            limit_price: None,
            stop_price: Some(stop_price),
        }
    }

    /// Validate caller-supplied fields.
    ///
    /// Returns a description of the first violation, if any. Quantity must be
    /// positive and price fields must match the order kind.
    #[must_use]
    pub fn validation_error(&self) -> Option<String> {
        if self.quantity == 0 {
            return Some("quantity must be positive".to_string());
        }
        if self.kind.requires_limit_price() && self.limit_price.is_none() {
            return Some(format!("{} order requires a limit price", self.kind));
        }
        if self.kind.requires_stop_price() && self.stop_price.is_none() {
            return Some(format!("{} order requires a stop price", self.kind));
        }
        None
    }
}

/// Complete order state as tracked by the order book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Venue-assigned order ID.
    pub order_id: String,
    /// Contract symbol.
    pub symbol: String,
    /// Order side.
    pub side: OrderSide,
    /// Quantity in contracts (post-clamp).
    pub quantity: u32,
    /// Order kind.
    pub kind: OrderKind,
    /// Limit price (if applicable).
    pub limit_price: Option<Decimal>,
    /// Stop price (if applicable).
    pub stop_price: Option<Decimal>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Filled quantity. Never exceeds `quantity`.
    pub filled_quantity: u32,
    /// Volume-weighted average fill price.
    pub filled_avg_price: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a submitted order from an accepted draft and a venue order ID.
    #[must_use]
    pub fn submitted(draft: &OrderDraft, order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            symbol: draft.symbol.clone(),
            side: draft.side,
            quantity: draft.quantity,
            kind: draft.kind,
            limit_price: draft.limit_price,
            stop_price: draft.stop_price,
            status: OrderStatus::Submitted,
            filled_quantity: 0,
            filled_avg_price: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Remaining quantity to be filled.
    #[must_use]
    pub const fn remaining_quantity(&self) -> u32 {
        self.quantity - self.filled_quantity
    }
}

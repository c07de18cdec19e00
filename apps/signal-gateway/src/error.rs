//! Error taxonomy for the gateway core.
//!
//! Venue failures during submit/cancel/query are caught inside the
//! coordinator and downgraded to result values; only the conditions a caller
//! must be able to branch on surface as `GatewayError`.

use crate::broker::BrokerError;

/// Errors surfaced to the command layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A trading operation was attempted while disconnected from the venue.
    ///
    /// Distinct from a risk-gate rejection so a transport layer can map it
    /// to 503-style semantics.
    #[error("not connected to venue")]
    NotConnected,

    /// Unrecognized signal type in a signal command.
    #[error("invalid signal type: {0}")]
    InvalidSignal(String),

    /// Caller-supplied order fields are invalid (zero quantity, missing
    /// required limit/stop price).
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// A venue error that the operation's contract allows to surface
    /// (e.g. market data subscription).
    #[error("venue error: {0}")]
    Venue(#[from] BrokerError),
}

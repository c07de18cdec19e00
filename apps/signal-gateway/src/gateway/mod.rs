//! Execution gateway core.
//!
//! The coordinator and the state it owns: order book, position ledger,
//! market data cache, liveness monitor, and signal handling.

mod book;
mod cache;
mod core;
mod ledger;
mod monitor;
mod signal;

pub use book::OrderBook;
pub use cache::MarketDataCache;
pub use core::{ExecutionCoordinator, GatewayStatus};
pub use ledger::PositionLedger;
pub use monitor::ConnectionMonitor;
pub use signal::{SignalKind, SignalOutcome, SignalRequest};

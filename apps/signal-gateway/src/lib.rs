// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Signal Gateway - Rust Core Library
//!
//! A risk-gated order execution gateway between an external strategy system
//! and a broker venue. The gateway receives signals and order commands,
//! decides through the risk gate whether each order may be sent, tracks
//! in-flight orders/positions/account state, and fans state-change events
//! out to observers.
//!
//! # Architecture
//!
//! - `models`: domain types (orders, positions, account, market data)
//! - `broker`: the narrow venue capability interface and its adapters
//! - `risk`: pre-trade risk gate (contract cap, daily loss cap, switch)
//! - `events`: typed event union + generic publish/subscribe bus
//! - `gateway`: the execution coordinator and the state it owns
//! - `config`: YAML configuration with env interpolation
//!
//! The transport layer (HTTP/WebSocket), venue wire protocols, and order
//! persistence are out of scope; the coordinator exposes in-process
//! interfaces for adjacent layers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod broker;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod risk;
pub mod telemetry;

pub use broker::{BrokerAdapter, BrokerError, MockBroker, PaperBroker};
pub use config::{Config, load_config};
pub use error::GatewayError;
pub use events::{EventBus, EventCategory, GatewayEvent};
pub use gateway::{ExecutionCoordinator, GatewayStatus, SignalKind, SignalRequest};
pub use risk::{RiskConfig, RiskGate, RiskRejection, RiskVerdict};

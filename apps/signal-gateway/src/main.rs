//! Signal Gateway Binary
//!
//! Starts the gateway over the simulated paper venue: loads configuration,
//! connects, subscribes the default contract, and runs until Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin signal-gateway
//! ```
//!
//! # Environment Variables
//!
//! - `SIGNAL_GATEWAY_CONFIG`: config file path (default: config.yaml)
//! - `RUST_LOG`: log level (default: info)

use anyhow::Context;
use rust_decimal::Decimal;

use signal_gateway::broker::PaperBroker;
use signal_gateway::config::load_config;
use signal_gateway::gateway::ExecutionCoordinator;
use signal_gateway::risk::RiskGate;
use signal_gateway::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let config_path = std::env::var("SIGNAL_GATEWAY_CONFIG").ok();
    let config = load_config(config_path.as_deref()).context("loading configuration")?;

    tracing::info!(
        venue = %config.broker.venue,
        default_contract = %config.trading.default_contract,
        max_contracts = config.trading.max_contracts,
        max_daily_loss = %config.trading.max_daily_loss,
        "Starting signal gateway"
    );

    let broker = PaperBroker::new(
        config.broker.account_id.clone(),
        Decimal::try_from(config.broker.starting_balance).context("starting balance")?,
    )
    .context("building paper venue")?;

    let coordinator = ExecutionCoordinator::new(
        broker,
        RiskGate::new(config.trading.to_risk_config()),
        config.safety.heartbeat_interval(),
    );

    if coordinator.connect().await {
        if let Err(e) = coordinator
            .subscribe_market_data(&config.trading.default_contract)
            .await
        {
            tracing::warn!(error = %e, "Failed to subscribe to market data");
        }
    } else {
        tracing::warn!("Failed to connect to venue - running in offline mode");
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    tracing::info!("Shutting down");
    coordinator.disconnect().await;

    Ok(())
}

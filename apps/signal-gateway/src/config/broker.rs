//! Broker venue configuration.

use serde::{Deserialize, Serialize};

/// Venue session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Venue identifier (currently only "paper" ships with the gateway).
    #[serde(default = "default_venue")]
    pub venue: String,
    /// Account identifier used by the venue session.
    #[serde(default = "default_account_id")]
    pub account_id: String,
    /// Starting balance for the simulated venue.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            venue: default_venue(),
            account_id: default_account_id(),
            starting_balance: default_starting_balance(),
        }
    }
}

fn default_venue() -> String {
    "paper".to_string()
}

fn default_account_id() -> String {
    "sim-account".to_string()
}

const fn default_starting_balance() -> f64 {
    150_000.0
}

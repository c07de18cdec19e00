//! Trading safety configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::risk::RiskConfig;

/// Trading limits and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Contract subscribed at startup (e.g. "ESH5").
    #[serde(default = "default_contract")]
    pub default_contract: String,
    /// Per-order contract cap; larger requests are clamped.
    #[serde(default = "default_max_contracts")]
    pub max_contracts: u32,
    /// Daily loss cap in account currency; a breach disables trading.
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: Decimal,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_contract: default_contract(),
            max_contracts: default_max_contracts(),
            max_daily_loss: default_max_daily_loss(),
        }
    }
}

impl TradingConfig {
    /// Convert to the risk gate's configuration type.
    #[must_use]
    pub fn to_risk_config(&self) -> RiskConfig {
        RiskConfig {
            max_contracts: self.max_contracts,
            max_daily_loss: self.max_daily_loss,
        }
    }
}

fn default_contract() -> String {
    "ESH5".to_string()
}

const fn default_max_contracts() -> u32 {
    5
}

fn default_max_daily_loss() -> Decimal {
    Decimal::new(1500, 0)
}

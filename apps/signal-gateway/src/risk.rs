//! Risk gate - pre-trade safety checks.
//!
//! Evaluated before every order submission, never cached. The gate holds the
//! process-wide risk state (trading switch, running daily PnL) behind
//! interior mutability; one gate is built per coordinator so tests get fresh
//! state.

use std::sync::RwLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::OrderDraft;

/// Risk gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Per-order contract cap. Requests above it are clamped, not rejected.
    pub max_contracts: u32,
    /// Daily loss cap in account currency. Breaching it disables trading.
    pub max_daily_loss: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_contracts: 5,
            max_daily_loss: Decimal::new(1500, 0),
        }
    }
}

/// Why an order was rejected by the gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskRejection {
    /// The trading switch is off (manually, or after a loss breach).
    #[error("trading disabled")]
    TradingDisabled,

    /// Running daily PnL breached the configured loss cap.
    #[error("daily loss limit reached: {daily_pnl} < -{limit}")]
    DailyLossLimitReached {
        /// Running daily PnL at evaluation time.
        daily_pnl: Decimal,
        /// Configured loss cap.
        limit: Decimal,
    },
}

/// Outcome of evaluating an order draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskVerdict {
    /// Order may be submitted as requested.
    Allow,
    /// Order may be submitted at the reduced quantity.
    Clamp(u32),
    /// Order must not be submitted.
    Reject(RiskRejection),
}

struct RiskState {
    trading_enabled: bool,
    daily_pnl: Decimal,
}

/// Stateless-per-call policy gate over process-wide risk state.
pub struct RiskGate {
    config: RiskConfig,
    state: RwLock<RiskState>,
}

impl RiskGate {
    /// Create a gate with trading enabled and zero daily PnL.
    #[must_use]
    pub fn new(config: RiskConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RiskState {
                trading_enabled: true,
                daily_pnl: Decimal::ZERO,
            }),
        }
    }

    /// Evaluate an order draft.
    ///
    /// Rules, in order: trading switch, contract cap (clamp), daily loss cap.
    /// A loss breach flips the trading switch off as a side effect; that
    /// transition is one-way until [`RiskGate::reset_daily_stats`] or
    /// [`RiskGate::enable_trading`].
    pub fn evaluate(&self, draft: &OrderDraft) -> RiskVerdict {
        let Ok(mut state) = self.state.write() else {
            return RiskVerdict::Reject(RiskRejection::TradingDisabled);
        };

        if !state.trading_enabled {
            warn!(symbol = %draft.symbol, "Order rejected: trading disabled");
            return RiskVerdict::Reject(RiskRejection::TradingDisabled);
        }

        let clamped = if draft.quantity > self.config.max_contracts {
            warn!(
                symbol = %draft.symbol,
                requested = draft.quantity,
                cap = self.config.max_contracts,
                "Order quantity exceeds cap, clamping"
            );
            Some(self.config.max_contracts)
        } else {
            None
        };

        if state.daily_pnl < -self.config.max_daily_loss {
            state.trading_enabled = false;
            warn!(
                daily_pnl = %state.daily_pnl,
                limit = %self.config.max_daily_loss,
                "Daily loss limit reached, trading disabled"
            );
            return RiskVerdict::Reject(RiskRejection::DailyLossLimitReached {
                daily_pnl: state.daily_pnl,
                limit: self.config.max_daily_loss,
            });
        }

        clamped.map_or(RiskVerdict::Allow, RiskVerdict::Clamp)
    }

    /// Turn the trading switch on.
    pub fn enable_trading(&self) {
        if let Ok(mut state) = self.state.write() {
            state.trading_enabled = true;
        }
        info!("Trading enabled");
    }

    /// Turn the trading switch off.
    pub fn disable_trading(&self) {
        if let Ok(mut state) = self.state.write() {
            state.trading_enabled = false;
        }
    }

    /// Whether the trading switch is on.
    #[must_use]
    pub fn is_trading_enabled(&self) -> bool {
        self.state.read().map(|s| s.trading_enabled).unwrap_or(false)
    }

    /// Record the running daily PnL figure (fed from account refreshes).
    pub fn record_daily_pnl(&self, daily_pnl: Decimal) {
        if let Ok(mut state) = self.state.write() {
            state.daily_pnl = daily_pnl;
        }
    }

    /// Current running daily PnL.
    #[must_use]
    pub fn daily_pnl(&self) -> Decimal {
        self.state.read().map(|s| s.daily_pnl).unwrap_or_default()
    }

    /// Reset daily statistics: zero PnL and re-enable trading.
    pub fn reset_daily_stats(&self) {
        if let Ok(mut state) = self.state.write() {
            state.daily_pnl = Decimal::ZERO;
            state.trading_enabled = true;
        }
        info!("Daily stats reset");
    }

    /// The configured contract cap.
    #[must_use]
    pub const fn max_contracts(&self) -> u32 {
        self.config.max_contracts
    }
}

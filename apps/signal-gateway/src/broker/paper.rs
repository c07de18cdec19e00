//! Simulated broker venue.
//!
//! Fills market orders immediately at a configurable reference price and
//! lets resting orders sit until cancelled. Gives the gateway a runnable
//! venue without any wire protocol; the binary uses it as its default
//! adapter.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{OrderKind, OrderSide};

use super::{
    BrokerAdapter, BrokerError, VenueAccount, VenueAck, VenueOrderSpec, VenuePosition,
    VenueSymbology,
};

/// Simulated venue with immediate market-order fills.
pub struct PaperBroker {
    symbology: VenueSymbology,
    account_id: String,
    starting_balance: Decimal,
    reference_price: RwLock<Decimal>,
    positions: RwLock<HashMap<String, VenuePosition>>,
    resting_orders: RwLock<HashMap<String, VenueOrderSpec>>,
}

impl PaperBroker {
    /// Build a paper venue for the given account.
    pub fn new(account_id: impl Into<String>, starting_balance: Decimal) -> Result<Self, BrokerError> {
        let symbology = VenueSymbology::new(
            [
                (OrderKind::Market, "MKT"),
                (OrderKind::Limit, "LMT"),
                (OrderKind::Stop, "STP"),
                (OrderKind::StopLimit, "STP_LMT"),
            ],
            [(OrderSide::Buy, "B"), (OrderSide::Sell, "S")],
        )?;

        Ok(Self {
            symbology,
            account_id: account_id.into(),
            starting_balance,
            reference_price: RwLock::new(Decimal::ZERO),
            positions: RwLock::new(HashMap::new()),
            resting_orders: RwLock::new(HashMap::new()),
        })
    }

    /// Set the price at which market orders fill.
    pub fn set_reference_price(&self, price: Decimal) {
        if let Ok(mut reference) = self.reference_price.write() {
            *reference = price;
        }
    }

    /// Resting (unfilled, uncancelled) order count.
    #[must_use]
    pub fn resting_order_count(&self) -> usize {
        self.resting_orders.read().map(|o| o.len()).unwrap_or(0)
    }

    fn apply_fill(&self, spec: &VenueOrderSpec, fill_price: Decimal) {
        let Ok(mut positions) = self.positions.write() else {
            return;
        };

        let position = positions
            .entry(spec.symbol.clone())
            .or_insert_with(|| VenuePosition {
                symbol: spec.symbol.clone(),
                quantity: 0,
                avg_price: Decimal::ZERO,
                unrealized_pnl: Decimal::ZERO,
                realized_pnl: Decimal::ZERO,
            });

        let delta = match spec.side {
            OrderSide::Buy => i64::from(spec.quantity),
            OrderSide::Sell => -i64::from(spec.quantity),
        };
        let old_qty = position.quantity;
        let new_qty = old_qty + delta;

        if old_qty == 0 || old_qty.signum() == delta.signum() {
            // Opening or adding: weighted average entry.
            let old_cost = Decimal::from(old_qty.abs()) * position.avg_price;
            let add_cost = Decimal::from(delta.abs()) * fill_price;
            let total = Decimal::from(old_qty.abs() + delta.abs());
            if total > Decimal::ZERO {
                position.avg_price = (old_cost + add_cost) / total;
            }
        } else {
            // Reducing or reversing: realize PnL on the closed portion.
            let closed = delta.abs().min(old_qty.abs());
            let per_contract = if old_qty > 0 {
                fill_price - position.avg_price
            } else {
                position.avg_price - fill_price
            };
            position.realized_pnl += per_contract * Decimal::from(closed);

            if new_qty != 0 && new_qty.signum() != old_qty.signum() {
                position.avg_price = fill_price;
            }
        }

        position.quantity = new_qty;
        if new_qty == 0 {
            positions.remove(&spec.symbol);
        }
    }
}

#[async_trait]
impl BrokerAdapter for PaperBroker {
    async fn connect(&self) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn subscribe(&self, _symbol: &str) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn submit_order(&self, spec: &VenueOrderSpec) -> Result<VenueAck, BrokerError> {
        let order_id = format!("SIM-{}", Uuid::new_v4());

        tracing::debug!(
            order_id = %order_id,
            symbol = %spec.symbol,
            side = %self.symbology.side_code(spec.side),
            kind = %self.symbology.kind_code(spec.kind),
            quantity = spec.quantity,
            "Paper venue accepted order"
        );

        if spec.kind == OrderKind::Market {
            let fill_price = self
                .reference_price
                .read()
                .map(|p| *p)
                .unwrap_or(Decimal::ZERO);
            self.apply_fill(spec, fill_price);
        } else if let Ok(mut resting) = self.resting_orders.write() {
            resting.insert(order_id.clone(), spec.clone());
        }

        Ok(VenueAck {
            order_id,
            ack_status: "SUBMITTED".to_string(),
        })
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        if let Ok(mut resting) = self.resting_orders.write() {
            resting.remove(order_id);
        }
        Ok(())
    }

    async fn cancel_all_orders(&self) -> Result<(), BrokerError> {
        if let Ok(mut resting) = self.resting_orders.write() {
            resting.clear();
        }
        Ok(())
    }

    async fn get_positions(&self) -> Result<Vec<VenuePosition>, BrokerError> {
        Ok(self
            .positions
            .read()
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_account(&self) -> Result<VenueAccount, BrokerError> {
        let realized: Decimal = self
            .positions
            .read()
            .map(|p| p.values().map(|pos| pos.realized_pnl).sum())
            .unwrap_or(Decimal::ZERO);

        Ok(VenueAccount {
            account_id: self.account_id.clone(),
            balance: self.starting_balance + realized,
            buying_power: self.starting_balance + realized,
            daily_pnl: realized,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: realized,
        })
    }

    async fn health_check(&self) -> Result<(), BrokerError> {
        Ok(())
    }

    fn venue_name(&self) -> &'static str {
        "paper"
    }
}

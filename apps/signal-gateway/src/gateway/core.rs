//! Execution coordinator.
//!
//! Single owner of all mutable gateway state. Commands flow through the risk
//! gate, out to the broker venue, into the order book and position ledger,
//! and onto the event bus; venue pushes (market data, fills) flow the same
//! way minus the gate. Venue failures are caught here and downgraded to
//! result values; only connection state and caller-input problems surface
//! as errors.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info, warn};

use crate::broker::{BrokerAdapter, VenueExecution, VenueOrderSpec};
use crate::error::GatewayError;
use crate::events::{ConnectionStatus, EventBus, GatewayEvent};
use crate::models::{
    AccountInfo, MarketDataSnapshot, Order, OrderDraft, OrderSide, Position, VenueTick,
};
use crate::risk::{RiskGate, RiskVerdict};

use super::book::OrderBook;
use super::cache::MarketDataCache;
use super::ledger::PositionLedger;
use super::monitor::ConnectionMonitor;
use super::signal::{SignalKind, SignalOutcome, SignalRequest};

/// A live venue session: present only while connected.
struct LiveSession {
    /// Shutdown signal for the liveness monitor.
    shutdown: broadcast::Sender<()>,
}

/// Connection state as a sum type: operations that need the venue go through
/// [`ExecutionCoordinator::require_connected`], so there is no nullable
/// client to check anywhere else.
enum LinkState {
    Disconnected,
    Connected(LiveSession),
}

/// Gateway status summary for health/status surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayStatus {
    /// Whether the venue session is up.
    pub connected: bool,
    /// Whether the trading switch is on.
    pub trading_enabled: bool,
    /// Running daily PnL as seen by the risk gate.
    pub daily_pnl: Decimal,
    /// Number of tracked positions.
    pub positions: usize,
    /// Number of open orders.
    pub open_orders: usize,
}

/// Orchestrates order execution against a broker venue.
pub struct ExecutionCoordinator<B: BrokerAdapter + 'static> {
    broker: Arc<B>,
    risk: RiskGate,
    book: OrderBook,
    ledger: PositionLedger,
    market: MarketDataCache,
    events: EventBus<GatewayEvent>,
    link: RwLock<LinkState>,
    heartbeat_interval: Duration,
    account: std::sync::RwLock<Option<AccountInfo>>,
}

impl<B: BrokerAdapter + 'static> ExecutionCoordinator<B> {
    /// Create a coordinator over a venue adapter, initially disconnected.
    #[must_use]
    pub fn new(broker: B, risk: RiskGate, heartbeat_interval: Duration) -> Self {
        Self {
            broker: Arc::new(broker),
            risk,
            book: OrderBook::new(),
            ledger: PositionLedger::new(),
            market: MarketDataCache::new(),
            events: EventBus::new(),
            link: RwLock::new(LinkState::Disconnected),
            heartbeat_interval,
            account: std::sync::RwLock::new(None),
        }
    }

    /// The event bus observers subscribe on.
    #[must_use]
    pub const fn events(&self) -> &EventBus<GatewayEvent> {
        &self.events
    }

    /// The risk gate (trading switch, daily stats).
    #[must_use]
    pub const fn risk(&self) -> &RiskGate {
        &self.risk
    }

    /// The venue adapter.
    #[must_use]
    pub fn broker(&self) -> &B {
        &self.broker
    }

    // =========================================================================
    // Connection management
    // =========================================================================

    /// Establish the venue session.
    ///
    /// On success starts the liveness monitor and publishes a connection
    /// event. On failure the gateway stays disconnected and the cause is
    /// reported through the connection event and the return value - never
    /// an error. Connecting while connected is a no-op.
    pub async fn connect(&self) -> bool {
        let mut link = self.link.write().await;
        if matches!(*link, LinkState::Connected(_)) {
            return true;
        }

        info!(venue = self.broker.venue_name(), "Connecting to venue");
        match self.broker.connect().await {
            Ok(()) => {
                let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
                let monitor =
                    ConnectionMonitor::new(Arc::clone(&self.broker), self.heartbeat_interval);
                tokio::spawn(monitor.run(shutdown_rx));

                *link = LinkState::Connected(LiveSession {
                    shutdown: shutdown_tx,
                });
                drop(link);

                info!(venue = self.broker.venue_name(), "Connected to venue");
                self.events
                    .publish(&GatewayEvent::ConnectionStatus(ConnectionStatus {
                        connected: true,
                        detail: None,
                    }));
                true
            }
            Err(e) => {
                drop(link);
                error!(venue = self.broker.venue_name(), error = %e, "Failed to connect to venue");
                self.events
                    .publish(&GatewayEvent::ConnectionStatus(ConnectionStatus {
                        connected: false,
                        detail: Some(e.to_string()),
                    }));
                false
            }
        }
    }

    /// Tear down the venue session.
    ///
    /// Cancels the liveness monitor and leaves the order book and position
    /// ledger in their last-known state. Disconnecting while disconnected is
    /// a no-op.
    pub async fn disconnect(&self) {
        let mut link = self.link.write().await;
        let LinkState::Connected(session) =
            std::mem::replace(&mut *link, LinkState::Disconnected)
        else {
            return;
        };
        drop(link);

        let _ = session.shutdown.send(());
        if let Err(e) = self.broker.disconnect().await {
            error!(error = %e, "Error disconnecting from venue");
        }

        info!(venue = self.broker.venue_name(), "Disconnected from venue");
        self.events
            .publish(&GatewayEvent::ConnectionStatus(ConnectionStatus {
                connected: false,
                detail: None,
            }));
    }

    /// Whether the venue session is up.
    pub async fn is_connected(&self) -> bool {
        matches!(*self.link.read().await, LinkState::Connected(_))
    }

    async fn require_connected(&self) -> Result<(), GatewayError> {
        if self.is_connected().await {
            Ok(())
        } else {
            Err(GatewayError::NotConnected)
        }
    }

    // =========================================================================
    // Market data
    // =========================================================================

    /// Subscribe to venue market data for a symbol.
    pub async fn subscribe_market_data(&self, symbol: &str) -> Result<(), GatewayError> {
        self.require_connected().await?;
        info!(symbol, "Subscribing to market data");
        self.broker.subscribe(symbol).await?;
        Ok(())
    }

    /// Ingest a market data push from the venue.
    ///
    /// Overwrites the cache entry and publishes a market data event. Never
    /// raises past this boundary: malformed pushes are logged and dropped so
    /// the venue's delivery loop is never broken.
    pub fn on_market_data(&self, tick: VenueTick) {
        if tick.symbol.is_empty() {
            warn!("Market data push without symbol, dropping");
            return;
        }

        let snapshot = tick.into_snapshot();
        debug!(symbol = %snapshot.symbol, last = %snapshot.last_price, "Market data update");
        self.market.update(snapshot.clone());
        self.events.publish(&GatewayEvent::MarketData(snapshot));
    }

    /// Latest cached snapshot for a symbol.
    #[must_use]
    pub fn market_data(&self, symbol: &str) -> Option<MarketDataSnapshot> {
        self.market.get(symbol)
    }

    // =========================================================================
    // Order management
    // =========================================================================

    /// Place an order.
    ///
    /// The draft is validated, risk-gated, and submitted. A risk-gate
    /// rejection or venue failure yields `Ok(None)` (cause in the logs); a
    /// clamp adjusts the quantity silently. `Err` is reserved for
    /// disconnection and invalid caller input.
    pub async fn place_order(&self, draft: OrderDraft) -> Result<Option<Order>, GatewayError> {
        if let Some(reason) = draft.validation_error() {
            return Err(GatewayError::InvalidOrder(reason));
        }
        self.require_connected().await?;

        let mut draft = draft;
        match self.risk.evaluate(&draft) {
            RiskVerdict::Reject(rejection) => {
                warn!(symbol = %draft.symbol, reason = %rejection, "Order blocked by risk gate");
                return Ok(None);
            }
            RiskVerdict::Clamp(quantity) => draft.quantity = quantity,
            RiskVerdict::Allow => {}
        }

        info!(
            symbol = %draft.symbol,
            side = %draft.side,
            quantity = draft.quantity,
            kind = %draft.kind,
            "Placing order"
        );

        let spec = VenueOrderSpec {
            symbol: draft.symbol.clone(),
            side: draft.side,
            quantity: draft.quantity,
            kind: draft.kind,
            limit_price: draft.limit_price,
            stop_price: draft.stop_price,
        };

        match self.broker.submit_order(&spec).await {
            Ok(ack) => {
                let order = Order::submitted(&draft, ack.order_id);
                info!(order_id = %order.order_id, "Order placed");
                self.book.insert(order.clone());
                self.events.publish(&GatewayEvent::OrderUpdate(order.clone()));
                Ok(Some(order))
            }
            Err(e) => {
                error!(symbol = %draft.symbol, error = %e, "Failed to place order");
                Ok(None)
            }
        }
    }

    /// Cancel a single order.
    ///
    /// Cancelling an unknown order, or one already filled, rejected, or
    /// cancelled, is a no-op reporting failure with the status unchanged.
    pub async fn cancel_order(&self, order_id: &str) -> Result<bool, GatewayError> {
        self.require_connected().await?;

        match self.book.get(order_id) {
            None => {
                warn!(order_id, "Cancel requested for unknown order");
                return Ok(false);
            }
            Some(order) if !order.status.is_open() => {
                warn!(order_id, status = ?order.status, "Cancel requested for non-open order");
                return Ok(false);
            }
            Some(_) => {}
        }

        match self.broker.cancel_order(order_id).await {
            Ok(()) => {
                if let Some(order) = self.book.mark_cancelled(order_id) {
                    self.events.publish(&GatewayEvent::OrderUpdate(order));
                }
                info!(order_id, "Order cancelled");
                Ok(true)
            }
            Err(e) => {
                error!(order_id, error = %e, "Failed to cancel order");
                Ok(false)
            }
        }
    }

    /// Cancel all open orders, best-effort.
    pub async fn cancel_all_orders(&self) -> Result<bool, GatewayError> {
        self.require_connected().await?;

        match self.broker.cancel_all_orders().await {
            Ok(()) => {
                for order in self.book.mark_cancelled_open() {
                    self.events.publish(&GatewayEvent::OrderUpdate(order));
                }
                info!("All open orders cancelled");
                Ok(true)
            }
            Err(e) => {
                error!(error = %e, "Failed to cancel all orders");
                Ok(false)
            }
        }
    }

    /// Ingest a fill report pushed by the venue.
    ///
    /// Updates the order book and position ledger and publishes the
    /// corresponding events. Never raises past this boundary.
    pub fn on_execution_report(&self, report: VenueExecution) {
        if report.fill_quantity == 0 {
            return;
        }

        debug!(
            order_id = %report.order_id,
            symbol = %report.symbol,
            quantity = report.fill_quantity,
            price = %report.fill_price,
            "Fill report"
        );

        if let Some(order) =
            self.book
                .apply_fill(&report.order_id, report.fill_quantity, report.fill_price)
        {
            self.events.publish(&GatewayEvent::OrderUpdate(order));
        }
        if let Some(position) = self.ledger.apply_fill(
            &report.symbol,
            report.side,
            report.fill_quantity,
            report.fill_price,
        ) {
            self.events.publish(&GatewayEvent::PositionUpdate(position));
        }
    }

    /// Get an order by venue ID.
    #[must_use]
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.book.get(order_id)
    }

    /// All open orders.
    #[must_use]
    pub fn open_orders(&self) -> Vec<Order> {
        self.book.open_orders()
    }

    // =========================================================================
    // Positions and account
    // =========================================================================

    /// Current positions.
    ///
    /// When connected this is an authoritative venue refresh that replaces
    /// the ledger wholesale; when disconnected (or when the query fails) the
    /// last-known cached snapshot is returned.
    pub async fn get_positions(&self) -> Vec<Position> {
        if !self.is_connected().await {
            return self.ledger.all();
        }

        match self.broker.get_positions().await {
            Ok(venue_positions) => {
                let positions: Vec<Position> = venue_positions
                    .into_iter()
                    .map(|p| Position {
                        symbol: p.symbol,
                        quantity: p.quantity,
                        avg_price: p.avg_price,
                        unrealized_pnl: p.unrealized_pnl,
                        realized_pnl: p.realized_pnl,
                    })
                    .collect();
                self.ledger.replace_all(positions.clone());
                positions
            }
            Err(e) => {
                warn!(error = %e, "Position query failed, serving cached ledger");
                self.ledger.all()
            }
        }
    }

    /// Close the position in a symbol with one opposite-side market order.
    ///
    /// A flat or absent position is a no-op success. The close goes through
    /// the full [`ExecutionCoordinator::place_order`] path, so it is still
    /// subject to the risk gate and venue failure modes.
    pub async fn close_position(&self, symbol: &str) -> Result<bool, GatewayError> {
        let Some(position) = self.ledger.get(symbol) else {
            debug!(symbol, "No position to close");
            return Ok(true);
        };
        if position.is_flat() {
            return Ok(true);
        }

        let side = if position.quantity > 0 {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        };
        let draft = OrderDraft::market(symbol, side, position.abs_quantity());

        info!(symbol, quantity = position.abs_quantity(), side = %side, "Closing position");
        Ok(self.place_order(draft).await?.is_some())
    }

    /// Close every known position, continue-on-error.
    ///
    /// All symbols are attempted even when one fails; the result is the
    /// logical AND of the individual outcomes.
    pub async fn close_all_positions(&self) -> bool {
        let mut all_ok = true;
        for symbol in self.ledger.symbols() {
            match self.close_position(&symbol).await {
                Ok(true) => {}
                Ok(false) => all_ok = false,
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "Failed to close position");
                    all_ok = false;
                }
            }
        }
        all_ok
    }

    /// Account information.
    ///
    /// When connected the account (and positions) are refreshed from the
    /// venue and the daily PnL figure is fed into the risk gate; when
    /// disconnected or on failure, the last-known snapshot is returned.
    pub async fn get_account_info(&self) -> Option<AccountInfo> {
        if !self.is_connected().await {
            return self.cached_account();
        }

        match self.broker.get_account().await {
            Ok(account) => {
                let positions = self.get_positions().await;
                let info = AccountInfo {
                    account_id: account.account_id,
                    balance: account.balance,
                    buying_power: account.buying_power,
                    daily_pnl: account.daily_pnl,
                    unrealized_pnl: account.unrealized_pnl,
                    realized_pnl: account.realized_pnl,
                    positions,
                };
                self.risk.record_daily_pnl(info.daily_pnl);
                if let Ok(mut cached) = self.account.write() {
                    *cached = Some(info.clone());
                }
                Some(info)
            }
            Err(e) => {
                warn!(error = %e, "Account query failed, serving cached snapshot");
                self.cached_account()
            }
        }
    }

    fn cached_account(&self) -> Option<AccountInfo> {
        self.account.read().ok().and_then(|a| a.clone())
    }

    // =========================================================================
    // Signals and safety
    // =========================================================================

    /// Execute a trading signal from the strategy system.
    ///
    /// LONG/SHORT place a market entry and, when a stop price is supplied
    /// and the entry succeeded, an opposite-side protective stop through the
    /// same order path. EXIT closes the named position and cancels all open
    /// orders. Unknown signal types are rejected as invalid input.
    pub async fn execute_signal(
        &self,
        request: &SignalRequest,
    ) -> Result<SignalOutcome, GatewayError> {
        let kind: SignalKind = request.signal_type.parse()?;
        self.require_connected().await?;

        info!(
            signal = ?kind,
            symbol = %request.symbol,
            contracts = request.contracts,
            "Executing signal"
        );

        match kind {
            SignalKind::Long | SignalKind::Short => {
                let side = if kind == SignalKind::Long {
                    OrderSide::Buy
                } else {
                    OrderSide::Sell
                };

                let entry = self
                    .place_order(OrderDraft::market(&request.symbol, side, request.contracts))
                    .await?;

                let protective = match (request.stop_loss, &entry) {
                    (Some(stop_price), Some(_)) => {
                        self.place_order(OrderDraft::stop(
                            &request.symbol,
                            side.opposite(),
                            request.contracts,
                            stop_price,
                        ))
                        .await?
                    }
                    _ => None,
                };

                Ok(SignalOutcome {
                    kind,
                    entry,
                    protective,
                    exited: false,
                })
            }
            SignalKind::Exit => {
                let closed = self.close_position(&request.symbol).await?;
                let cancelled = self.cancel_all_orders().await?;
                Ok(SignalOutcome {
                    kind,
                    entry: None,
                    protective: None,
                    exited: closed && cancelled,
                })
            }
        }
    }

    /// Emergency stop: disable trading, cancel all orders, close all
    /// positions - in that fixed order, regardless of intermediate failures.
    ///
    /// Reports the logical AND of the two best-effort steps. Note that the
    /// trading switch is off by the time positions are closed, so closes of
    /// non-flat positions are gate-rejected; a reset or explicit enable is
    /// required to flatten afterwards.
    pub async fn emergency_stop(&self) -> bool {
        warn!("EMERGENCY STOP requested");
        self.risk.disable_trading();

        let cancelled = match self.cancel_all_orders().await {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, "Emergency cancel failed");
                false
            }
        };
        let closed = self.close_all_positions().await;

        warn!(cancelled, closed, "Emergency stop complete");
        cancelled && closed
    }

    /// Status summary.
    pub async fn status(&self) -> GatewayStatus {
        GatewayStatus {
            connected: self.is_connected().await,
            trading_enabled: self.risk.is_trading_enabled(),
            daily_pnl: self.risk.daily_pnl(),
            positions: self.ledger.count(),
            open_orders: self.book.open_orders().len(),
        }
    }
}

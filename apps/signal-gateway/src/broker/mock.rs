//! Mock broker adapter for testing.
//!
//! Returns simulated responses without any venue connectivity. Failures can
//! be injected per call type, and call counts are recorded so tests can
//! assert how often the venue was hit.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{
    BrokerAdapter, BrokerError, VenueAccount, VenueAck, VenueOrderSpec, VenuePosition,
};

/// Mock venue adapter with failure injection and call counters.
#[derive(Debug, Default)]
pub struct MockBroker {
    order_counter: AtomicU64,
    fail_connect: AtomicBool,
    fail_submit: AtomicBool,
    fail_cancel: AtomicBool,
    fail_queries: AtomicBool,
    submit_count: AtomicU32,
    cancel_count: AtomicU32,
    cancel_all_count: AtomicU32,
    health_check_count: AtomicU32,
    submitted: RwLock<Vec<VenueOrderSpec>>,
    positions: RwLock<Vec<VenuePosition>>,
    account: RwLock<Option<VenueAccount>>,
}

impl MockBroker {
    /// Create a mock venue that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order_counter: AtomicU64::new(1),
            ..Self::default()
        }
    }

    /// Make `connect` fail.
    pub fn fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Make `submit_order` fail.
    pub fn fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    /// Make cancel calls fail.
    pub fn fail_cancel(&self, fail: bool) {
        self.fail_cancel.store(fail, Ordering::SeqCst);
    }

    /// Make subscribe and position/account queries fail.
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Seed the positions returned by `get_positions`.
    pub fn set_positions(&self, positions: Vec<VenuePosition>) {
        if let Ok(mut guard) = self.positions.write() {
            *guard = positions;
        }
    }

    /// Seed the account returned by `get_account`.
    pub fn set_account(&self, account: VenueAccount) {
        if let Ok(mut guard) = self.account.write() {
            *guard = Some(account);
        }
    }

    /// Number of `submit_order` calls.
    #[must_use]
    pub fn submit_count(&self) -> u32 {
        self.submit_count.load(Ordering::SeqCst)
    }

    /// Number of `cancel_order` calls.
    #[must_use]
    pub fn cancel_count(&self) -> u32 {
        self.cancel_count.load(Ordering::SeqCst)
    }

    /// Number of `cancel_all_orders` calls.
    #[must_use]
    pub fn cancel_all_count(&self) -> u32 {
        self.cancel_all_count.load(Ordering::SeqCst)
    }

    /// Number of `health_check` calls.
    #[must_use]
    pub fn health_check_count(&self) -> u32 {
        self.health_check_count.load(Ordering::SeqCst)
    }

    /// Every order spec passed to `submit_order`, in call order.
    #[must_use]
    pub fn submitted_orders(&self) -> Vec<VenueOrderSpec> {
        self.submitted.read().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BrokerAdapter for MockBroker {
    async fn connect(&self) -> Result<(), BrokerError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(BrokerError::Connection("mock connect failure".to_string()));
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn subscribe(&self, symbol: &str) -> Result<(), BrokerError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(BrokerError::Subscription(format!(
                "mock subscribe failure for {symbol}"
            )));
        }
        Ok(())
    }

    async fn submit_order(&self, spec: &VenueOrderSpec) -> Result<VenueAck, BrokerError> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(BrokerError::Order("mock submit failure".to_string()));
        }

        if let Ok(mut submitted) = self.submitted.write() {
            submitted.push(spec.clone());
        }

        let id = self.order_counter.fetch_add(1, Ordering::SeqCst);
        Ok(VenueAck {
            order_id: format!("MOCK-{id}"),
            ack_status: "SUBMITTED".to_string(),
        })
    }

    async fn cancel_order(&self, _order_id: &str) -> Result<(), BrokerError> {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(BrokerError::Order("mock cancel failure".to_string()));
        }
        Ok(())
    }

    async fn cancel_all_orders(&self) -> Result<(), BrokerError> {
        self.cancel_all_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(BrokerError::Order("mock cancel-all failure".to_string()));
        }
        Ok(())
    }

    async fn get_positions(&self) -> Result<Vec<VenuePosition>, BrokerError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(BrokerError::Query("mock positions failure".to_string()));
        }
        Ok(self.positions.read().map(|p| p.clone()).unwrap_or_default())
    }

    async fn get_account(&self) -> Result<VenueAccount, BrokerError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(BrokerError::Query("mock account failure".to_string()));
        }
        let seeded = self.account.read().ok().and_then(|a| a.clone());
        Ok(seeded.unwrap_or_else(|| VenueAccount {
            account_id: "mock".to_string(),
            balance: Decimal::ZERO,
            buying_power: Decimal::ZERO,
            daily_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
        }))
    }

    async fn health_check(&self) -> Result<(), BrokerError> {
        self.health_check_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn venue_name(&self) -> &'static str {
        "mock"
    }
}

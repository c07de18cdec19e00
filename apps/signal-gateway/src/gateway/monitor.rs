//! Connection liveness monitoring.
//!
//! A background task that runs for the lifetime of a venue session, checking
//! session health on a fixed interval. It only observes and logs; state
//! mutation stays with the coordinator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::broker::BrokerAdapter;

/// Periodic venue health checker.
pub struct ConnectionMonitor<B: BrokerAdapter> {
    broker: Arc<B>,
    interval: Duration,
}

impl<B: BrokerAdapter + 'static> ConnectionMonitor<B> {
    /// Create a monitor over a venue adapter.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Arc is not const-constructible
    pub fn new(broker: Arc<B>, interval: Duration) -> Self {
        Self { broker, interval }
    }

    /// Run the liveness loop until the shutdown signal arrives.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.interval);
        // The first tick fires immediately; skip it so the loop paces from
        // connect time.
        interval.tick().await;

        tracing::info!(
            venue = self.broker.venue_name(),
            interval_secs = self.interval.as_secs(),
            "Liveness monitor started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.broker.health_check().await {
                        Ok(()) => tracing::trace!("Venue health check passed"),
                        Err(e) => tracing::warn!(error = %e, "Venue health check failed"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Liveness monitor shutting down");
                    break;
                }
            }
        }
    }
}

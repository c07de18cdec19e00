//! Integration tests driving the execution coordinator over the mock venue.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use signal_gateway::broker::{MockBroker, VenueAccount, VenueExecution, VenuePosition};
use signal_gateway::error::GatewayError;
use signal_gateway::events::GatewayEvent;
use signal_gateway::gateway::{ExecutionCoordinator, SignalRequest};
use signal_gateway::models::{OrderDraft, OrderKind, OrderSide, OrderStatus, VenueTick};
use signal_gateway::risk::{RiskConfig, RiskGate};

fn make_coordinator() -> ExecutionCoordinator<MockBroker> {
    let risk = RiskGate::new(RiskConfig {
        max_contracts: 5,
        max_daily_loss: dec!(1500),
    });
    ExecutionCoordinator::new(MockBroker::new(), risk, Duration::from_secs(30))
}

async fn connected_coordinator() -> ExecutionCoordinator<MockBroker> {
    let coordinator = make_coordinator();
    assert!(coordinator.connect().await);
    coordinator
}

fn venue_position(symbol: &str, quantity: i64) -> VenuePosition {
    VenuePosition {
        symbol: symbol.to_string(),
        quantity,
        avg_price: dec!(4500),
        unrealized_pnl: Decimal::ZERO,
        realized_pnl: Decimal::ZERO,
    }
}

// ============================================================================
// Connection
// ============================================================================

#[tokio::test]
async fn test_place_order_while_disconnected_is_not_connected() {
    let coordinator = make_coordinator();

    let result = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await;
    assert!(matches!(result, Err(GatewayError::NotConnected)));
}

#[tokio::test]
async fn test_connect_failure_reports_via_event_not_error() {
    let coordinator = make_coordinator();
    coordinator.broker().fail_connect(true);

    let (_id, mut rx) = coordinator.events().subscribe();
    assert!(!coordinator.connect().await);
    assert!(!coordinator.is_connected().await);

    let event = rx.try_recv().unwrap();
    match event {
        GatewayEvent::ConnectionStatus(status) => {
            assert!(!status.connected);
            assert!(status.detail.is_some());
        }
        other => panic!("expected connection status event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_twice_is_noop() {
    let coordinator = connected_coordinator().await;
    assert!(coordinator.connect().await);
    assert!(coordinator.is_connected().await);
}

#[tokio::test]
async fn test_disconnect_keeps_last_known_state() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2)]);
    coordinator.get_positions().await;

    coordinator.disconnect().await;
    assert!(!coordinator.is_connected().await);

    // Cached ledger still answers while disconnected.
    let positions = coordinator.get_positions().await;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].quantity, 2);
}

// ============================================================================
// Risk-gated order placement
// ============================================================================

#[tokio::test]
async fn test_over_cap_order_is_clamped_and_submitted() {
    // maxContracts=5, daily loss cap=$1500, current PnL=$0.
    let coordinator = connected_coordinator().await;

    let order = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 10))
        .await
        .unwrap()
        .expect("clamped order should be submitted");

    assert_eq!(order.quantity, 5);
    assert_eq!(order.status, OrderStatus::Submitted);

    let submitted = coordinator.broker().submitted_orders();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].quantity, 5);
}

#[tokio::test]
async fn test_trading_disabled_yields_no_order_not_disconnection() {
    let coordinator = connected_coordinator().await;
    coordinator.risk().disable_trading();

    let result = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await;

    // The cause must be distinguishable from NotConnected: a rejected order
    // is Ok(None), never an error.
    assert!(matches!(result, Ok(None)));
    assert_eq!(coordinator.broker().submit_count(), 0);
}

#[tokio::test]
async fn test_venue_submit_failure_yields_no_order() {
    let coordinator = connected_coordinator().await;
    coordinator.broker().fail_submit(true);

    let result = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await;
    assert!(matches!(result, Ok(None)));
    assert_eq!(coordinator.open_orders().len(), 0);
}

#[tokio::test]
async fn test_missing_limit_price_is_invalid_order() {
    let coordinator = connected_coordinator().await;

    let draft = OrderDraft {
        symbol: "ESH5".to_string(),
        side: OrderSide::Buy,
        quantity: 1,
        kind: OrderKind::Limit,
        limit_price: None,
        stop_price: None,
    };
    let result = coordinator.place_order(draft).await;
    assert!(matches!(result, Err(GatewayError::InvalidOrder(_))));
}

#[tokio::test]
async fn test_daily_loss_from_account_refresh_disables_trading() {
    let coordinator = connected_coordinator().await;
    coordinator.broker().set_account(VenueAccount {
        account_id: "acct".to_string(),
        balance: dec!(148000),
        buying_power: dec!(148000),
        daily_pnl: dec!(-2000),
        unrealized_pnl: Decimal::ZERO,
        realized_pnl: dec!(-2000),
    });

    let account = coordinator.get_account_info().await.unwrap();
    assert_eq!(account.daily_pnl, dec!(-2000));

    // The refreshed loss figure breaches the cap on the next evaluation and
    // latches the trading switch off.
    let result = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await;
    assert!(matches!(result, Ok(None)));
    assert!(!coordinator.risk().is_trading_enabled());
    assert_eq!(coordinator.broker().submit_count(), 0);
}

#[tokio::test]
async fn test_order_update_event_published_on_placement() {
    let coordinator = connected_coordinator().await;
    let (_id, mut rx) = coordinator.events().subscribe();

    let order = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await
        .unwrap()
        .unwrap();

    let event = rx.try_recv().unwrap();
    match event {
        GatewayEvent::OrderUpdate(published) => assert_eq!(published.order_id, order.order_id),
        other => panic!("expected order update event, got {other:?}"),
    }
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_open_order() {
    let coordinator = connected_coordinator().await;
    let order = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await
        .unwrap()
        .unwrap();

    assert!(coordinator.cancel_order(&order.order_id).await.unwrap());
    assert_eq!(
        coordinator.get_order(&order.order_id).unwrap().status,
        OrderStatus::Cancelled
    );
}

#[tokio::test]
async fn test_cancel_filled_order_fails_and_leaves_status() {
    let coordinator = connected_coordinator().await;
    let order = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 2))
        .await
        .unwrap()
        .unwrap();

    // Venue reports the order fully filled.
    coordinator.on_execution_report(VenueExecution {
        order_id: order.order_id.clone(),
        symbol: "ESH5".to_string(),
        side: OrderSide::Buy,
        fill_quantity: 2,
        fill_price: dec!(4500),
    });

    assert!(!coordinator.cancel_order(&order.order_id).await.unwrap());
    assert_eq!(
        coordinator.get_order(&order.order_id).unwrap().status,
        OrderStatus::Filled
    );
    // The venue was never asked to cancel a terminal order.
    assert_eq!(coordinator.broker().cancel_count(), 0);
}

#[tokio::test]
async fn test_cancel_unknown_order_fails() {
    let coordinator = connected_coordinator().await;
    assert!(!coordinator.cancel_order("nope").await.unwrap());
}

#[tokio::test]
async fn test_cancel_all_marks_open_orders() {
    let coordinator = connected_coordinator().await;
    for _ in 0..3 {
        coordinator
            .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
            .await
            .unwrap()
            .unwrap();
    }
    assert_eq!(coordinator.open_orders().len(), 3);

    assert!(coordinator.cancel_all_orders().await.unwrap());
    assert_eq!(coordinator.open_orders().len(), 0);
    assert_eq!(coordinator.broker().cancel_all_count(), 1);
}

// ============================================================================
// Fills and positions
// ============================================================================

#[tokio::test]
async fn test_fill_reports_update_book_and_ledger() {
    let coordinator = connected_coordinator().await;
    let order = coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 4))
        .await
        .unwrap()
        .unwrap();

    coordinator.on_execution_report(VenueExecution {
        order_id: order.order_id.clone(),
        symbol: "ESH5".to_string(),
        side: OrderSide::Buy,
        fill_quantity: 1,
        fill_price: dec!(4500),
    });

    let tracked = coordinator.get_order(&order.order_id).unwrap();
    assert_eq!(tracked.status, OrderStatus::PartiallyFilled);
    assert_eq!(tracked.filled_quantity, 1);
    assert!(tracked.filled_quantity <= tracked.quantity);

    // Remaining fills complete the order; filled quantity never exceeds the
    // order quantity even if the venue over-reports.
    coordinator.on_execution_report(VenueExecution {
        order_id: order.order_id.clone(),
        symbol: "ESH5".to_string(),
        side: OrderSide::Buy,
        fill_quantity: 9,
        fill_price: dec!(4501),
    });
    let tracked = coordinator.get_order(&order.order_id).unwrap();
    assert_eq!(tracked.status, OrderStatus::Filled);
    assert_eq!(tracked.filled_quantity, 4);
}

#[tokio::test]
async fn test_get_positions_replaces_ledger_wholesale() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2), venue_position("NQH5", -1)]);
    assert_eq!(coordinator.get_positions().await.len(), 2);

    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 1)]);
    let positions = coordinator.get_positions().await;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].quantity, 1);
}

#[tokio::test]
async fn test_close_position_places_opposite_market_order() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2)]);
    coordinator.get_positions().await;

    assert!(coordinator.close_position("ESH5").await.unwrap());

    let submitted = coordinator.broker().submitted_orders();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].side, OrderSide::Sell);
    assert_eq!(submitted[0].quantity, 2);
    assert_eq!(submitted[0].kind, OrderKind::Market);
}

#[tokio::test]
async fn test_close_short_position_buys_back() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("NQH5", -3)]);
    coordinator.get_positions().await;

    assert!(coordinator.close_position("NQH5").await.unwrap());
    let submitted = coordinator.broker().submitted_orders();
    assert_eq!(submitted[0].side, OrderSide::Buy);
    assert_eq!(submitted[0].quantity, 3);
}

#[tokio::test]
async fn test_close_absent_position_is_noop_success() {
    let coordinator = connected_coordinator().await;
    assert!(coordinator.close_position("ESH5").await.unwrap());
    assert_eq!(coordinator.broker().submit_count(), 0);
}

#[tokio::test]
async fn test_close_all_attempts_every_symbol_despite_failures() {
    let coordinator = connected_coordinator().await;
    coordinator.broker().set_positions(vec![
        venue_position("ESH5", 2),
        venue_position("NQH5", -1),
        venue_position("YMH5", 4),
    ]);
    coordinator.get_positions().await;

    // Every close fails at the venue, but all symbols are still attempted:
    // one submission per non-flat position.
    coordinator.broker().fail_submit(true);
    assert!(!coordinator.close_all_positions().await);
    assert_eq!(coordinator.broker().submit_count(), 3);
}

#[tokio::test]
async fn test_close_all_success_aggregates_and() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2), venue_position("NQH5", -1)]);
    coordinator.get_positions().await;

    assert!(coordinator.close_all_positions().await);
    assert_eq!(coordinator.broker().submit_count(), 2);
}

// ============================================================================
// Signals
// ============================================================================

#[tokio::test]
async fn test_long_signal_with_stop_places_entry_and_protective() {
    let coordinator = connected_coordinator().await;

    let outcome = coordinator
        .execute_signal(&SignalRequest {
            signal_type: "LONG".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 2,
            stop_loss: Some(dec!(4500.0)),
        })
        .await
        .unwrap();

    assert!(outcome.entry.is_some());
    assert!(outcome.protective.is_some());

    // Exactly two venue submissions: MARKET BUY 2, then STOP SELL 2 @ 4500.
    let submitted = coordinator.broker().submitted_orders();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].kind, OrderKind::Market);
    assert_eq!(submitted[0].side, OrderSide::Buy);
    assert_eq!(submitted[0].quantity, 2);
    assert_eq!(submitted[1].kind, OrderKind::Stop);
    assert_eq!(submitted[1].side, OrderSide::Sell);
    assert_eq!(submitted[1].quantity, 2);
    assert_eq!(submitted[1].stop_price, Some(dec!(4500.0)));
}

#[tokio::test]
async fn test_short_signal_protective_is_buy_stop() {
    let coordinator = connected_coordinator().await;

    coordinator
        .execute_signal(&SignalRequest {
            signal_type: "SHORT".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 1,
            stop_loss: Some(dec!(4550.0)),
        })
        .await
        .unwrap();

    let submitted = coordinator.broker().submitted_orders();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].side, OrderSide::Sell);
    assert_eq!(submitted[1].side, OrderSide::Buy);
    assert_eq!(submitted[1].kind, OrderKind::Stop);
}

#[tokio::test]
async fn test_long_signal_without_stop_places_only_entry() {
    let coordinator = connected_coordinator().await;

    let outcome = coordinator
        .execute_signal(&SignalRequest {
            signal_type: "LONG".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 1,
            stop_loss: None,
        })
        .await
        .unwrap();

    assert!(outcome.entry.is_some());
    assert!(outcome.protective.is_none());
    assert_eq!(coordinator.broker().submit_count(), 1);
}

#[tokio::test]
async fn test_failed_entry_skips_protective_order() {
    let coordinator = connected_coordinator().await;
    coordinator.broker().fail_submit(true);

    let outcome = coordinator
        .execute_signal(&SignalRequest {
            signal_type: "LONG".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 1,
            stop_loss: Some(dec!(4500.0)),
        })
        .await
        .unwrap();

    assert!(outcome.entry.is_none());
    assert!(outcome.protective.is_none());
    assert_eq!(coordinator.broker().submit_count(), 1);
}

#[tokio::test]
async fn test_exit_signal_closes_position_and_cancels_orders() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2)]);
    coordinator.get_positions().await;

    // A protective order is resting.
    coordinator
        .place_order(OrderDraft::stop("ESH5", OrderSide::Sell, 2, dec!(4450.0)))
        .await
        .unwrap()
        .unwrap();

    let outcome = coordinator
        .execute_signal(&SignalRequest {
            signal_type: "EXIT".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 0,
            stop_loss: None,
        })
        .await
        .unwrap();

    assert!(outcome.exited);
    // One opposite-side market order sized to the position.
    let submitted = coordinator.broker().submitted_orders();
    let close = submitted.last().unwrap();
    assert_eq!(close.kind, OrderKind::Market);
    assert_eq!(close.side, OrderSide::Sell);
    assert_eq!(close.quantity, 2);
    // Cleanup cancelled all open orders.
    assert_eq!(coordinator.broker().cancel_all_count(), 1);
    assert_eq!(coordinator.open_orders().len(), 0);
}

#[tokio::test]
async fn test_exit_signal_with_no_open_orders_succeeds() {
    let coordinator = connected_coordinator().await;

    let outcome = coordinator
        .execute_signal(&SignalRequest {
            signal_type: "EXIT".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 0,
            stop_loss: None,
        })
        .await
        .unwrap();

    assert!(outcome.exited);
}

#[tokio::test]
async fn test_unknown_signal_type_is_invalid_input() {
    let coordinator = connected_coordinator().await;

    let result = coordinator
        .execute_signal(&SignalRequest {
            signal_type: "HOLD".to_string(),
            symbol: "ESH5".to_string(),
            contracts: 1,
            stop_loss: None,
        })
        .await;

    assert!(matches!(result, Err(GatewayError::InvalidSignal(_))));
    assert_eq!(coordinator.broker().submit_count(), 0);
}

// ============================================================================
// Emergency stop
// ============================================================================

#[tokio::test]
async fn test_emergency_stop_disables_then_cancels_then_closes() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2)]);
    coordinator.get_positions().await;

    let success = coordinator.emergency_stop().await;

    // Trading is disabled first, so the close is gate-rejected: the
    // composite reports failure while the cancel still went through.
    assert!(!success);
    assert!(!coordinator.risk().is_trading_enabled());
    assert_eq!(coordinator.broker().cancel_all_count(), 1);
    assert_eq!(coordinator.broker().submit_count(), 0);
}

#[tokio::test]
async fn test_emergency_stop_with_no_positions_succeeds() {
    let coordinator = connected_coordinator().await;

    assert!(coordinator.emergency_stop().await);
    assert!(!coordinator.risk().is_trading_enabled());
    assert_eq!(coordinator.broker().cancel_all_count(), 1);
}

// ============================================================================
// Market data
// ============================================================================

#[tokio::test]
async fn test_market_data_round_trip() {
    let coordinator = connected_coordinator().await;
    let (_id, mut rx) = coordinator.events().subscribe();

    let before = chrono::Utc::now();
    coordinator.on_market_data(VenueTick {
        symbol: "ESH5".to_string(),
        last_price: Some(dec!(4510.25)),
        bid: Some(dec!(4510.00)),
        ask: Some(dec!(4510.50)),
        bid_size: Some(12),
        ask_size: Some(9),
        volume: Some(1_000_000),
        high: Some(dec!(4520.00)),
        low: Some(dec!(4490.00)),
        open: Some(dec!(4495.00)),
    });

    let snapshot = coordinator.market_data("ESH5").unwrap();
    assert_eq!(snapshot.last_price, dec!(4510.25));
    assert_eq!(snapshot.bid, dec!(4510.00));
    assert_eq!(snapshot.ask, dec!(4510.50));
    assert_eq!(snapshot.bid_size, 12);
    assert_eq!(snapshot.volume, 1_000_000);
    assert!(snapshot.timestamp >= before);

    let event = rx.try_recv().unwrap();
    assert!(matches!(event, GatewayEvent::MarketData(_)));
}

#[tokio::test]
async fn test_subscribe_requires_connection() {
    let coordinator = make_coordinator();
    let result = coordinator.subscribe_market_data("ESH5").await;
    assert!(matches!(result, Err(GatewayError::NotConnected)));
}

#[tokio::test]
async fn test_subscribe_failure_surfaces_to_caller() {
    let coordinator = connected_coordinator().await;
    coordinator.broker().fail_queries(true);

    let result = coordinator.subscribe_market_data("ESH5").await;
    assert!(matches!(result, Err(GatewayError::Venue(_))));
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn test_status_summary() {
    let coordinator = connected_coordinator().await;
    coordinator
        .broker()
        .set_positions(vec![venue_position("ESH5", 2)]);
    coordinator.get_positions().await;
    coordinator
        .place_order(OrderDraft::market("ESH5", OrderSide::Buy, 1))
        .await
        .unwrap()
        .unwrap();

    let status = coordinator.status().await;
    assert!(status.connected);
    assert!(status.trading_enabled);
    assert_eq!(status.positions, 1);
    assert_eq!(status.open_orders, 1);
}

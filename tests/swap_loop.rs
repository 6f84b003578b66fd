//! Polling loop behaviour against a scripted orchestrator.

use std::time::Duration;

use swapctl::commands::execute_swap;
use swapctl::error::AppError;
use swapctl::orderbook::{Action, OrderbookError};
use swapctl::swap::{SwapError, SwapPair, SwapPoller, SwapRequest};

mod common;
use common::{order_in, ScriptedOrchestrator};

const ORDER_ID: u64 = 42;
const PACE: Duration = Duration::from_millis(50);
const POLL: Duration = Duration::from_millis(20);

fn script(actions: &[Option<Action>]) -> ScriptedOrchestrator {
    let snapshots = actions
        .iter()
        .map(|action| match action {
            Some(action) => vec![order_in(ORDER_ID, *action)],
            None => Vec::new(),
        })
        .collect();
    ScriptedOrchestrator::new(ORDER_ID, snapshots, PACE)
}

#[tokio::test]
async fn test_initiate_then_redeem_steps_twice_and_exits() {
    let orchestrator = script(&[
        None,
        Some(Action::UserCanInitiate),
        Some(Action::UserCanInitiate),
        Some(Action::UserCanRedeem),
    ]);

    let steps = SwapPoller::new(&orchestrator, POLL)
        .run(ORDER_ID, "bcrt1q")
        .await
        .unwrap();

    assert_eq!(
        orchestrator.stepped(),
        vec![Action::UserCanInitiate, Action::UserCanRedeem]
    );
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].action, Action::UserCanRedeem);
    assert!(steps.iter().all(|s| s.tx.is_some()));
    assert!(orchestrator.was_unsubscribed());
}

#[tokio::test]
async fn test_repeated_initiate_after_other_action_steps_again() {
    let orchestrator = script(&[
        Some(Action::UserCanInitiate),
        Some(Action::NoAction),
        Some(Action::UserCanInitiate),
    ]);

    let err = SwapPoller::new(&orchestrator, POLL)
        .run(ORDER_ID, "bcrt1q")
        .await
        .unwrap_err();

    // Never redeemable, so the loop only ends when the feed closes.
    assert!(matches!(err, SwapError::Orderbook(OrderbookError::FeedClosed)));
    assert_eq!(
        orchestrator.stepped(),
        vec![Action::UserCanInitiate, Action::UserCanInitiate]
    );
    assert!(!orchestrator.was_unsubscribed());
}

#[tokio::test]
async fn test_passive_actions_never_step() {
    let orchestrator = script(&[
        Some(Action::NoAction),
        Some(Action::CounterpartyCanInitiate),
        Some(Action::CounterpartyCanRedeem),
        Some(Action::UserCanRefund),
        Some(Action::Completed),
    ]);

    let err = SwapPoller::new(&orchestrator, POLL)
        .run(ORDER_ID, "bcrt1q")
        .await
        .unwrap_err();

    assert!(matches!(err, SwapError::Orderbook(OrderbookError::FeedClosed)));
    assert!(orchestrator.stepped().is_empty());
}

#[tokio::test]
async fn test_other_orders_are_ignored() {
    let orchestrator = ScriptedOrchestrator::new(
        ORDER_ID,
        vec![
            vec![order_in(7, Action::UserCanRedeem)],
            vec![
                order_in(7, Action::UserCanRedeem),
                order_in(ORDER_ID, Action::UserCanRedeem),
            ],
        ],
        PACE,
    );

    let steps = SwapPoller::new(&orchestrator, POLL)
        .run(ORDER_ID, "bcrt1q")
        .await
        .unwrap();

    assert_eq!(steps.len(), 1);
    assert_eq!(orchestrator.stepped(), vec![Action::UserCanRedeem]);
}

#[tokio::test]
async fn test_step_failure_propagates() {
    let orchestrator = script(&[Some(Action::UserCanInitiate)]).failing();

    let err = SwapPoller::new(&orchestrator, POLL)
        .run(ORDER_ID, "bcrt1q")
        .await
        .unwrap_err();

    assert!(matches!(err, SwapError::InvalidOrder { order_id: ORDER_ID, .. }));
    assert!(!orchestrator.was_unsubscribed());
}

#[tokio::test]
async fn test_execute_swap_submits_once_and_follows_order() {
    let orchestrator = script(&[
        Some(Action::UserCanInitiate),
        Some(Action::CounterpartyCanInitiate),
        Some(Action::UserCanRedeem),
    ]);
    let request = SwapRequest {
        pair: SwapPair::BTC_TO_WBTC,
        send_amount: 100_000,
        receive_amount: 99_700,
    };

    let (order_id, steps) = execute_swap(&orchestrator, "bcrt1q", request, POLL)
        .await
        .unwrap();

    assert_eq!(order_id, ORDER_ID);
    assert_eq!(steps.len(), 2);
    assert_eq!(*orchestrator.requests.lock().unwrap(), vec![request]);
}

#[tokio::test]
async fn test_execute_swap_surfaces_closed_feed() {
    let orchestrator = script(&[Some(Action::UserCanInitiate)]);
    let request = SwapRequest {
        pair: SwapPair::WBTC_TO_BTC,
        send_amount: 50_000,
        receive_amount: 49_850,
    };

    let err = execute_swap(&orchestrator, "0xf39f", request, POLL)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Swap(SwapError::Orderbook(OrderbookError::FeedClosed))
    ));
}

//! Swap polling loop.
//!
//! Samples the tracked order from the feed, classifies it and performs one
//! step whenever the classification moves to an actionable action. Exits
//! once the user can redeem, right after submitting the redeem.
//!
//! The loop wakes on every feed update and otherwise resamples once per
//! poll interval.

use std::time::Duration;

use crate::orderbook::{parse_status, Action, OrderId, OrderbookError};
use crate::swap::orchestrator::Orchestrator;
use crate::swap::stepper::StepOutcome;
use crate::swap::SwapResult;

/// What to do after observing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Perform one step for the action.
    pub step: bool,
    /// Stop polling after the step.
    pub done: bool,
}

/// De-duplicates consecutive actions.
///
/// Only the immediately preceding action is remembered, so an actionable
/// action is stepped again after any different action in between.
#[derive(Debug, Default, Clone)]
pub struct ActionTracker {
    prev: Option<Action>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `action` and decide whether it calls for a step.
    pub fn observe(&mut self, action: Action) -> Transition {
        let transition = Transition {
            step: action.is_actionable() && self.prev != Some(action),
            done: action == Action::UserCanRedeem,
        };
        self.prev = Some(action);
        transition
    }

    /// Action seen on the previous sample.
    pub fn previous(&self) -> Option<Action> {
        self.prev
    }
}

/// Drives one order to redemption.
pub struct SwapPoller<'a> {
    orchestrator: &'a dyn Orchestrator,
    poll_interval: Duration,
}

impl<'a> SwapPoller<'a> {
    pub fn new(orchestrator: &'a dyn Orchestrator, poll_interval: Duration) -> Self {
        Self {
            orchestrator,
            poll_interval,
        }
    }

    /// Follow `order_id` on the feed of `address` until the redeem step.
    ///
    /// Returns the outcome of every step performed. Runs until redemption
    /// or until the feed closes; there is no overall timeout.
    pub async fn run(&self, order_id: OrderId, address: &str) -> SwapResult<Vec<StepOutcome>> {
        let mut feed = self.orchestrator.subscribe_orders(address).await?;
        let mut tracker = ActionTracker::new();
        let mut steps = Vec::new();

        tracing::info!(order_id, address = %address, "Waiting for order updates");

        loop {
            match tokio::time::timeout(self.poll_interval, feed.changed()).await {
                Ok(Ok(())) | Err(_) => {}
                Ok(Err(_)) => return Err(OrderbookError::FeedClosed.into()),
            }

            let order = feed
                .borrow_and_update()
                .iter()
                .find(|order| order.id == order_id)
                .cloned();
            let Some(order) = order else {
                tracing::trace!(order_id, "Order not in latest snapshot");
                continue;
            };

            let action = parse_status(&order);
            let transition = tracker.observe(action);

            if transition.step {
                let outcome = self.orchestrator.get_swap(&order).next().await?;
                match &outcome.tx {
                    Some(tx) => println!("{}: {}", outcome.action, tx),
                    None => println!("{}", outcome.action),
                }
                tracing::info!(order_id, action = %outcome.action, tx = ?outcome.tx, "Step performed");
                steps.push(outcome);
            }

            if transition.done {
                self.orchestrator.unsubscribe_orders().await?;
                tracing::info!(order_id, steps = steps.len(), "Swap redeemed");
                return Ok(steps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOOP: Action = Action::NoAction;
    const INIT: Action = Action::UserCanInitiate;
    const REDEEM: Action = Action::UserCanRedeem;

    /// Replays samples the way `run` does; `None` is a snapshot without
    /// the order. Returns the step count and the sample index it stopped at.
    fn replay(samples: &[Option<Action>]) -> (usize, Option<usize>) {
        let mut tracker = ActionTracker::new();
        let mut steps = 0;
        for (i, sample) in samples.iter().enumerate() {
            let Some(action) = sample else { continue };
            let t = tracker.observe(*action);
            if t.step {
                steps += 1;
            }
            if t.done {
                return (steps, Some(i));
            }
        }
        (steps, None)
    }

    #[test]
    fn missing_initiate_initiate_redeem_steps_twice() {
        let (steps, stopped) = replay(&[None, Some(INIT), Some(INIT), Some(REDEEM)]);
        assert_eq!(steps, 2);
        assert_eq!(stopped, Some(3));
    }

    #[test]
    fn intervening_action_resets_deduplication() {
        let (steps, stopped) = replay(&[Some(INIT), Some(NOOP), Some(INIT)]);
        assert_eq!(steps, 2);
        assert_eq!(stopped, None);
    }

    #[test]
    fn missing_order_does_not_reset_deduplication() {
        let (steps, _) = replay(&[Some(INIT), None, Some(INIT)]);
        assert_eq!(steps, 1);
    }

    #[test]
    fn non_actionable_actions_never_step() {
        let all_passive = [
            Action::NoAction,
            Action::CounterpartyCanInitiate,
            Action::CounterpartyCanRedeem,
            Action::UserCanRefund,
            Action::Completed,
        ];
        let samples: Vec<_> = all_passive.iter().chain(all_passive.iter()).map(|a| Some(*a)).collect();
        assert_eq!(replay(&samples), (0, None));
    }

    #[test]
    fn at_most_one_step_per_run_of_identical_actions() {
        let samples = [INIT, INIT, INIT, NOOP, NOOP, INIT, INIT, Action::CounterpartyCanInitiate, INIT];
        let mut tracker = ActionTracker::new();
        let steps: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|(_, a)| tracker.observe(**a).step)
            .map(|(i, _)| i)
            .collect();

        // One step at the start of each run of INIT.
        assert_eq!(steps, vec![0, 5, 8]);
    }

    #[test]
    fn terminates_only_on_redeem() {
        for action in [
            NOOP,
            INIT,
            Action::CounterpartyCanInitiate,
            Action::CounterpartyCanRedeem,
            Action::UserCanRefund,
            Action::Completed,
        ] {
            assert!(!ActionTracker::new().observe(action).done, "{:?}", action);
        }

        let t = ActionTracker::new().observe(REDEEM);
        assert!(t.step && t.done);
    }

    #[test]
    fn redeem_terminates_even_without_a_new_step() {
        let mut tracker = ActionTracker::new();
        tracker.observe(REDEEM);
        let t = tracker.observe(REDEEM);
        assert_eq!(t, Transition { step: false, done: true });
        assert_eq!(tracker.previous(), Some(REDEEM));
    }
}

//! Classification of an order into the next local action.

use std::fmt;

use crate::orderbook::types::{Order, OrderStatus, SwapStatus};

/// What the local party should do next for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Nothing to do; waiting on confirmations or the orderbook.
    NoAction,
    /// The order is filled and the user's HTLC can be funded.
    UserCanInitiate,
    /// The user's HTLC is funded; waiting for the filler's.
    CounterpartyCanInitiate,
    /// The filler's HTLC is funded; the user can claim it.
    UserCanRedeem,
    /// The user has claimed; the filler can claim with the revealed secret.
    CounterpartyCanRedeem,
    /// The user's HTLC timed out unredeemed.
    UserCanRefund,
    /// Both legs are redeemed.
    Completed,
}

impl Action {
    /// Whether the polling loop submits a transaction for this action.
    pub fn is_actionable(self) -> bool {
        matches!(self, Action::UserCanInitiate | Action::UserCanRedeem)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Action::NoAction => "No action",
            Action::UserCanInitiate => "Initiate",
            Action::CounterpartyCanInitiate => "Waiting for counterparty to initiate",
            Action::UserCanRedeem => "Redeem",
            Action::CounterpartyCanRedeem => "Waiting for counterparty to redeem",
            Action::UserCanRefund => "Refund",
            Action::Completed => "Completed",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `order` from the maker's point of view.
///
/// The maker funds the initiator leg and redeems the follower leg.
pub fn parse_status(order: &Order) -> Action {
    use SwapStatus::*;

    let initiator = order.initiator_atomic_swap.status;
    let follower = order.follower_atomic_swap.status;

    match (initiator, follower) {
        (Unknown, _) | (_, Unknown) => Action::NoAction,
        (Refunded | RefundDetected, _) => Action::NoAction,
        (Redeemed | RedeemDetected, _) => Action::Completed,
        (Expired, _) => Action::UserCanRefund,
        (_, Redeemed | RedeemDetected) => Action::CounterpartyCanRedeem,
        (_, Expired | Refunded | RefundDetected) => Action::NoAction,
        (_, Initiated) => Action::UserCanRedeem,
        (_, InitiateDetected) => Action::NoAction,
        (Initiated, NotStarted) => Action::CounterpartyCanInitiate,
        (InitiateDetected, NotStarted) => Action::NoAction,
        (NotStarted, NotStarted) if order.status == OrderStatus::Filled => Action::UserCanInitiate,
        (NotStarted, NotStarted) => Action::NoAction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::types::{Asset, AtomicSwap, Chain};

    fn leg(chain: Chain, asset: Asset, status: SwapStatus) -> AtomicSwap {
        AtomicSwap {
            chain,
            asset,
            initiator_address: "initiator".into(),
            redeemer_address: "redeemer".into(),
            amount: 100_000,
            timelock: 144,
            swap_id: None,
            initiate_tx_hash: None,
            redeem_tx_hash: None,
            status,
        }
    }

    fn order(status: OrderStatus, initiator: SwapStatus, follower: SwapStatus) -> Order {
        Order {
            id: 1,
            maker: "maker".into(),
            status,
            secret_hash: "00".repeat(32),
            nonce: 1,
            initiator_atomic_swap: leg(Chain::Bitcoin, Asset::Btc, initiator),
            follower_atomic_swap: leg(Chain::Evm, Asset::Wbtc, follower),
        }
    }

    #[test]
    fn classification_table() {
        use SwapStatus::*;

        let cases = [
            (OrderStatus::Created, NotStarted, NotStarted, Action::NoAction),
            (OrderStatus::Filled, NotStarted, NotStarted, Action::UserCanInitiate),
            (OrderStatus::Filled, InitiateDetected, NotStarted, Action::NoAction),
            (OrderStatus::Filled, Initiated, NotStarted, Action::CounterpartyCanInitiate),
            (OrderStatus::Filled, Initiated, InitiateDetected, Action::NoAction),
            (OrderStatus::Filled, Initiated, Initiated, Action::UserCanRedeem),
            (OrderStatus::Executed, Initiated, RedeemDetected, Action::CounterpartyCanRedeem),
            (OrderStatus::Executed, Initiated, Redeemed, Action::CounterpartyCanRedeem),
            (OrderStatus::Settled, Redeemed, Redeemed, Action::Completed),
            (OrderStatus::Expired, Expired, NotStarted, Action::UserCanRefund),
            (OrderStatus::Expired, Refunded, NotStarted, Action::NoAction),
            (OrderStatus::Filled, Initiated, Refunded, Action::NoAction),
            (OrderStatus::Cancelled, NotStarted, NotStarted, Action::NoAction),
            (OrderStatus::Unknown, NotStarted, NotStarted, Action::NoAction),
            (OrderStatus::Filled, Unknown, NotStarted, Action::NoAction),
            (OrderStatus::Filled, Initiated, Unknown, Action::NoAction),
        ];

        for (status, initiator, follower, expected) in cases {
            assert_eq!(
                parse_status(&order(status, initiator, follower)),
                expected,
                "{:?}/{:?}/{:?}",
                status,
                initiator,
                follower
            );
        }
    }

    #[test]
    fn only_initiate_and_redeem_are_actionable() {
        let actionable: Vec<_> = [
            Action::NoAction,
            Action::UserCanInitiate,
            Action::CounterpartyCanInitiate,
            Action::UserCanRedeem,
            Action::CounterpartyCanRedeem,
            Action::UserCanRefund,
            Action::Completed,
        ]
        .into_iter()
        .filter(|a| a.is_actionable())
        .collect();

        assert_eq!(actionable, vec![Action::UserCanInitiate, Action::UserCanRedeem]);
    }

    #[test]
    fn labels() {
        assert_eq!(Action::UserCanInitiate.to_string(), "Initiate");
        assert_eq!(Action::UserCanRedeem.to_string(), "Redeem");
    }
}

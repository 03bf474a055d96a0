//! The order status state machine.

use chrono::{DateTime, Duration, Utc};

use order_store::{Order, OrderStatus};

use super::{OrderAction, OrderError};

/// Policy knobs applied on top of the transition table.
#[derive(Debug, Clone, Default)]
pub struct TransitionPolicy {
    /// How long after creation a pending order may still be cancelled.
    /// None means no limit.
    pub cancel_window: Option<Duration>,
}

impl TransitionPolicy {
    /// A policy with no restrictions beyond the transition table.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// A policy limiting cancellation of pending orders to `hours` after
    /// creation.
    pub fn with_cancel_window(hours: i64) -> Self {
        Self {
            cancel_window: Some(Duration::hours(hours)),
        }
    }
}

/// Applies an action to an order, returning the updated record.
///
/// Pure function: the caller supplies `now` and persists the result. The
/// transition table is closed — any (status, action) pair outside it
/// fails with `InvalidTransition`, and the transition timestamps are set
/// exactly once, on the transition that reaches the corresponding status.
pub fn apply(
    order: &Order,
    action: OrderAction,
    now: DateTime<Utc>,
    policy: &TransitionPolicy,
) -> Result<Order, OrderError> {
    let mut updated = order.clone();

    match (order.status, action) {
        (OrderStatus::Pending, OrderAction::Process) => {
            updated.status = OrderStatus::InProcess;
            updated.confirmed_at = Some(now);
        }
        (OrderStatus::InProcess, OrderAction::Ship) => {
            updated.status = OrderStatus::Sent;
            updated.sent_at = Some(now);
        }
        (OrderStatus::Pending, OrderAction::Cancel) => {
            if let Some(window) = policy.cancel_window
                && now - order.created_at > window
            {
                return Err(OrderError::CancelWindowExpired {
                    hours: window.num_hours(),
                });
            }
            updated.status = OrderStatus::Cancelled;
        }
        (OrderStatus::InProcess, OrderAction::Cancel) => {
            updated.status = OrderStatus::Cancelled;
        }
        (status, action) => {
            return Err(OrderError::InvalidTransition { status, action });
        }
    }

    Ok(updated)
}

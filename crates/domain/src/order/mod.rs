//! Order lifecycle: actions, the status state machine, and the service
//! orchestrating creation and transitions.

mod machine;
mod service;

pub use machine::{TransitionPolicy, apply};
pub use service::OrderService;

use thiserror::Error;

use order_store::OrderStatus;

/// An administrative or customer action requested against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// Confirm a pending order and start preparing it.
    Process,

    /// Hand a confirmed order to the carrier.
    Ship,

    /// Cancel an order that hasn't shipped.
    Cancel,
}

impl OrderAction {
    /// Returns the action name as used in URLs and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Process => "process",
            OrderAction::Ship => "ship",
            OrderAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur when transitioning an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The requested action is illegal for the order's current status.
    /// Terminal statuses reject every action, including re-cancelling an
    /// already-cancelled order, so callers can tell "already handled"
    /// apart from "succeeded".
    #[error("invalid transition: cannot {action} an order in {status} status")]
    InvalidTransition {
        status: OrderStatus,
        action: OrderAction,
    },

    /// The order is older than the configured cancellation window.
    #[error("cancellation window of {hours} hours has expired")]
    CancelWindowExpired { hours: i64 },
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{OrderId, ProductId, UserEmail};

/// Status of an order in its lifecycle.
///
/// Transitions:
/// ```text
/// Pending ──process──► InProcess ──ship──► Sent
///    │                     │
///    └───────cancel────────┴──► Cancelled
/// ```
/// `Sent` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order was accepted and awaits confirmation.
    Pending,

    /// Order was confirmed and is being prepared.
    InProcess,

    /// Order left the warehouse (terminal state).
    Sent,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if no further transitions are possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Sent | OrderStatus::Cancelled)
    }

    /// Returns the status name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProcess => "IN_PROCESS",
            OrderStatus::Sent => "SENT",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line of an order: one product and the quantity requested.
///
/// Lines are produced by cart aggregation, so a quantity is always
/// positive and a product appears at most once per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// The product being ordered.
    pub product_id: ProductId,

    /// Requested quantity, always > 0.
    pub quantity: u32,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A persisted order record.
///
/// The line list is fixed at creation; only `status` and the two
/// transition timestamps change afterwards, and only through the order
/// state machine. The store enforces whole-record conditional writes via
/// the version token, so fields are plain data here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier, assigned at creation.
    pub id: OrderId,

    /// Email of the user who placed the order.
    pub user_email: UserEmail,

    /// Ordered lines, non-empty and immutable after creation.
    pub lines: Vec<OrderLine>,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// When the order was created.
    pub created_at: DateTime<Utc>,

    /// When the order was confirmed (PENDING → IN_PROCESS), if ever.
    pub confirmed_at: Option<DateTime<Utc>>,

    /// When the order was shipped (IN_PROCESS → SENT), if ever.
    pub sent_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a new order in `Pending` status with no transition
    /// timestamps.
    pub fn new(
        id: OrderId,
        user_email: UserEmail,
        lines: Vec<OrderLine>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_email,
            lines,
            status: OrderStatus::Pending,
            created_at,
            confirmed_at: None,
            sent_at: None,
        }
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            OrderId::new(),
            UserEmail::new("ana@example.com"),
            vec![OrderLine::new("SKU-001", 2), OrderLine::new("SKU-002", 1)],
            Utc::now(),
        )
    }

    #[test]
    fn new_order_starts_pending_without_timestamps() {
        let order = sample_order();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.confirmed_at.is_none());
        assert!(order.sent_at.is_none());
    }

    #[test]
    fn total_quantity_sums_lines() {
        assert_eq!(sample_order().total_quantity(), 3);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InProcess.is_terminal());
        assert!(OrderStatus::Sent.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProcess).unwrap(),
            "\"IN_PROCESS\""
        );
        assert_eq!(OrderStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn order_serialization_roundtrip() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}

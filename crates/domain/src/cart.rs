//! Cart aggregation: turning a sequence of cart operations into the
//! canonical line list submitted for validation.

use thiserror::Error;

use common::ProductId;
use order_store::OrderLine;

/// A single cart mutation issued by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOp {
    /// Adds `quantity` units of a product; negative deltas decrement.
    Add { product_id: ProductId, quantity: i64 },

    /// Removes the product's line entirely.
    Remove { product_id: ProductId },

    /// Sets the product's quantity to an absolute value; zero removes the
    /// line, negative values are rejected.
    Set { product_id: ProductId, quantity: i64 },
}

impl CartOp {
    /// Creates an add operation.
    pub fn add(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self::Add {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Creates a remove operation.
    pub fn remove(product_id: impl Into<ProductId>) -> Self {
        Self::Remove {
            product_id: product_id.into(),
        }
    }

    /// Creates a set-quantity operation.
    pub fn set(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self::Set {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Errors raised while aggregating cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A set-quantity operation carried a negative absolute quantity.
    #[error("negative quantity {quantity} for product {product_id}")]
    NegativeQuantity { product_id: ProductId, quantity: i64 },
}

/// Aggregates a sequence of cart operations into canonical order lines.
///
/// Repeated additions of the same product merge into one line with the
/// summed quantity; setting or decrementing a line to zero or below drops
/// it entirely, so no zero-quantity line ever surfaces downstream. Output
/// ordering is insertion order of first appearance, which keeps violation
/// reporting deterministic; a product re-added after removal counts as a
/// fresh first appearance.
pub fn aggregate(ops: &[CartOp]) -> Result<Vec<OrderLine>, CartError> {
    let mut lines: Vec<(ProductId, i64)> = Vec::new();

    for op in ops {
        match op {
            CartOp::Add {
                product_id,
                quantity,
            } => {
                if let Some(pos) = position(&lines, product_id) {
                    lines[pos].1 = lines[pos].1.saturating_add(*quantity);
                    if lines[pos].1 <= 0 {
                        lines.remove(pos);
                    }
                } else if *quantity > 0 {
                    lines.push((product_id.clone(), *quantity));
                }
            }
            CartOp::Remove { product_id } => {
                if let Some(pos) = position(&lines, product_id) {
                    lines.remove(pos);
                }
            }
            CartOp::Set {
                product_id,
                quantity,
            } => {
                if *quantity < 0 {
                    return Err(CartError::NegativeQuantity {
                        product_id: product_id.clone(),
                        quantity: *quantity,
                    });
                }
                match (position(&lines, product_id), *quantity) {
                    (Some(pos), 0) => {
                        lines.remove(pos);
                    }
                    (Some(pos), quantity) => lines[pos].1 = quantity,
                    (None, 0) => {}
                    (None, quantity) => lines.push((product_id.clone(), quantity)),
                }
            }
        }
    }

    Ok(lines
        .into_iter()
        .map(|(product_id, quantity)| {
            OrderLine::new(product_id, quantity.min(u32::MAX as i64) as u32)
        })
        .collect())
}

fn position(lines: &[(ProductId, i64)], product_id: &ProductId) -> Option<usize> {
    lines.iter().position(|(id, _)| id == product_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let lines = aggregate(&[CartOp::add("SKU-001", 2), CartOp::add("SKU-001", 3)]).unwrap();
        assert_eq!(lines, vec![OrderLine::new("SKU-001", 5)]);
    }

    #[test]
    fn output_preserves_first_appearance_order() {
        let lines = aggregate(&[
            CartOp::add("SKU-B", 1),
            CartOp::add("SKU-A", 1),
            CartOp::add("SKU-B", 1),
        ])
        .unwrap();
        let ids: Vec<_> = lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["SKU-B", "SKU-A"]);
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let lines = aggregate(&[CartOp::add("SKU-001", 2), CartOp::add("SKU-001", -2)]).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn decrement_below_zero_removes_line() {
        let lines = aggregate(&[CartOp::add("SKU-001", 1), CartOp::add("SKU-001", -5)]).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn set_to_zero_removes_line() {
        let lines = aggregate(&[CartOp::add("SKU-001", 4), CartOp::set("SKU-001", 0)]).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn set_overrides_quantity() {
        let lines = aggregate(&[CartOp::add("SKU-001", 4), CartOp::set("SKU-001", 7)]).unwrap();
        assert_eq!(lines, vec![OrderLine::new("SKU-001", 7)]);
    }

    #[test]
    fn set_on_absent_product_inserts_line() {
        let lines = aggregate(&[CartOp::set("SKU-001", 3)]).unwrap();
        assert_eq!(lines, vec![OrderLine::new("SKU-001", 3)]);
    }

    #[test]
    fn negative_set_is_rejected() {
        let result = aggregate(&[CartOp::set("SKU-001", -1)]);
        assert_eq!(
            result,
            Err(CartError::NegativeQuantity {
                product_id: ProductId::new("SKU-001"),
                quantity: -1,
            })
        );
    }

    #[test]
    fn remove_drops_line_and_ignores_absent() {
        let lines = aggregate(&[
            CartOp::add("SKU-001", 2),
            CartOp::remove("SKU-001"),
            CartOp::remove("SKU-002"),
        ])
        .unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn re_added_product_takes_a_new_position() {
        let lines = aggregate(&[
            CartOp::add("SKU-A", 1),
            CartOp::add("SKU-B", 1),
            CartOp::remove("SKU-A"),
            CartOp::add("SKU-A", 2),
        ])
        .unwrap();
        let ids: Vec<_> = lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["SKU-B", "SKU-A"]);
    }

    #[test]
    fn no_duplicates_or_non_positive_quantities_survive() {
        // A mixed op sequence can never yield a duplicate product or a
        // quantity below one.
        let ops = vec![
            CartOp::add("SKU-A", 3),
            CartOp::add("SKU-B", -1),
            CartOp::set("SKU-C", 2),
            CartOp::add("SKU-A", -1),
            CartOp::set("SKU-C", 0),
            CartOp::add("SKU-B", 2),
            CartOp::add("SKU-A", 1),
        ];
        let lines = aggregate(&ops).unwrap();

        let mut seen = std::collections::HashSet::new();
        for line in &lines {
            assert!(seen.insert(line.product_id.clone()), "duplicate line");
            assert!(line.quantity > 0, "non-positive quantity");
        }
        assert_eq!(lines, vec![OrderLine::new("SKU-A", 3), OrderLine::new("SKU-B", 2)]);
    }
}

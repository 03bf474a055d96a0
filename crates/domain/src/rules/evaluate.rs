//! Rule evaluation over a candidate cart.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use common::ProductId;
use order_store::OrderLine;

use crate::catalog::Product;

use super::{MaxItemsScope, OrderRule, RuleCriteria, RuleSet, Violation};

/// Validates a candidate cart against the configured rule set.
///
/// Pure function over the supplied snapshots: identical inputs always
/// yield the identical violation list. Every rule is evaluated and every
/// violation accumulated — nothing short-circuits, so a client sees all
/// problems at once.
///
/// Built-in checks run before the configured rules and carry no rule ID:
/// the cart must be non-empty, every line's product must resolve, and no
/// line may request more than the product's available quantity. Rules
/// that need product data evaluate over the resolved lines; quantity-only
/// rules see every line.
pub fn validate(
    lines: &[OrderLine],
    products: &HashMap<ProductId, Product>,
    rules: &RuleSet,
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    if lines.is_empty() {
        return Err(vec![Violation::builtin("cart contains no items")]);
    }

    for line in lines {
        match products.get(&line.product_id) {
            None => violations.push(Violation::builtin(format!(
                "unknown product: {}",
                line.product_id
            ))),
            Some(product) if product.available < line.quantity => {
                violations.push(Violation::builtin(format!(
                    "insufficient stock for product {}: {} requested, {} available",
                    line.product_id, line.quantity, product.available
                )));
            }
            Some(_) => {}
        }
    }

    let resolved: Vec<(&OrderLine, &Product)> = lines
        .iter()
        .filter_map(|line| products.get(&line.product_id).map(|product| (line, product)))
        .collect();

    for rule in rules.rules() {
        evaluate_rule(rule, lines, &resolved, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn evaluate_rule(
    rule: &OrderRule,
    lines: &[OrderLine],
    resolved: &[(&OrderLine, &Product)],
    violations: &mut Vec<Violation>,
) {
    match &rule.criteria {
        RuleCriteria::MaxItems {
            max_items,
            scope: MaxItemsScope::CartTotal,
        } => {
            let total: u64 = lines.iter().map(|line| line.quantity as u64).sum();
            if total > *max_items as u64 {
                violations.push(Violation::of_rule(
                    rule,
                    &[
                        ("limit", max_items.to_string()),
                        ("actual", total.to_string()),
                    ],
                ));
            }
        }

        RuleCriteria::MaxItems {
            max_items,
            scope: MaxItemsScope::PerLine,
        } => {
            for line in lines {
                if line.quantity > *max_items {
                    violations.push(Violation::of_rule(
                        rule,
                        &[
                            ("limit", max_items.to_string()),
                            ("actual", line.quantity.to_string()),
                            ("product", line.product_id.to_string()),
                        ],
                    ));
                }
            }
        }

        RuleCriteria::MaxWeight { max_weight } => {
            let total: f64 = resolved
                .iter()
                .map(|(line, product)| product.weight * line.quantity as f64)
                .sum();
            if total > *max_weight {
                violations.push(Violation::of_rule(
                    rule,
                    &[
                        ("limit", max_weight.to_string()),
                        ("actual", total.to_string()),
                    ],
                ));
            }
        }

        RuleCriteria::IncompatibleTypes { incompatible_types } => {
            let present: BTreeSet<&str> = resolved
                .iter()
                .filter(|(_, product)| incompatible_types.contains(&product.kind))
                .map(|(_, product)| product.kind.as_str())
                .collect();
            if present.len() >= 2 {
                let types = present.into_iter().collect::<Vec<_>>().join(", ");
                violations.push(Violation::of_rule(rule, &[("types", types)]));
            }
        }

        RuleCriteria::MaxPerType { limits } => {
            let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
            for (_, product) in resolved {
                *counts.entry(product.kind.as_str()).or_default() += 1;
            }
            for (kind, limit) in limits {
                let count = counts.get(kind.as_str()).copied().unwrap_or(0);
                if count > *limit {
                    violations.push(Violation::of_rule(
                        rule,
                        &[
                            ("type", kind.clone()),
                            ("limit", limit.to_string()),
                            ("actual", count.to_string()),
                        ],
                    ));
                }
            }
        }

        RuleCriteria::ForbiddenAttribute { attribute, value } => {
            for (line, product) in resolved {
                if product.attribute(attribute).as_deref() == Some(value.as_str()) {
                    violations.push(Violation::of_rule(
                        rule,
                        &[
                            ("product", line.product_id.to_string()),
                            ("attribute", attribute.clone()),
                            ("value", value.clone()),
                        ],
                    ));
                }
            }
        }
    }
}

//! Business rules gating order creation.
//!
//! Rules are configuration data: loaded once at process start, immutable
//! at runtime, and shared read-only across request handlers. Each rule is
//! a tagged criteria variant plus a user-facing message template; the
//! evaluation algorithm is selected by the variant, so no rule can carry
//! fields that don't apply to it.

mod evaluate;

pub use evaluate::validate;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Numeric identifier of a configured rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(u32);

impl RuleId {
    /// Creates a rule ID from a raw value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a `MAX_ITEMS` rule bounds: the whole cart's quantity or each
/// single line's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaxItemsScope {
    /// The sum of quantities across all cart lines.
    #[default]
    CartTotal,

    /// The quantity of any single line ("no more than N of one item").
    PerLine,
}

/// Criteria for one rule, tagged by rule type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "criteria", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCriteria {
    /// Bounds item quantity; see [`MaxItemsScope`] for what is counted.
    #[serde(rename_all = "camelCase")]
    MaxItems {
        max_items: u32,
        #[serde(default)]
        scope: MaxItemsScope,
    },

    /// Bounds the summed weight (unit weight × quantity) of the cart.
    #[serde(rename_all = "camelCase")]
    MaxWeight { max_weight: f64 },

    /// Forbids two or more of the listed type tags from appearing in the
    /// same cart.
    #[serde(rename_all = "camelCase")]
    IncompatibleTypes { incompatible_types: BTreeSet<String> },

    /// Bounds how many distinct products of a given type tag a cart may
    /// contain.
    #[serde(rename_all = "camelCase")]
    MaxPerType { limits: BTreeMap<String, u32> },

    /// Forbids products whose attribute view carries the given value.
    #[serde(rename_all = "camelCase")]
    ForbiddenAttribute { attribute: String, value: String },
}

/// A configured business rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRule {
    /// Rule identifier, carried on violations.
    pub id: RuleId,

    /// Human-readable description for admin screens.
    pub description: String,

    /// The evaluation criteria, tagged by rule type.
    #[serde(flatten)]
    pub criteria: RuleCriteria,

    /// Violation message template. `{placeholder}` keys are substituted
    /// with observed values when the rule fails.
    pub message: String,
}

/// The immutable, load-once set of rules a cart must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<OrderRule>,
}

impl RuleSet {
    /// Creates a rule set from configured rules.
    pub fn new(rules: Vec<OrderRule>) -> Self {
        Self { rules }
    }

    /// Creates an empty rule set (every cart passes configured rules).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a rule set from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the configured rules in evaluation order.
    pub fn rules(&self) -> &[OrderRule] {
        &self.rules
    }

    /// Returns the number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The storefront's stock rule set: at most 3 items per cart, at most
    /// 10kg total, and no liquid together with gaseous products.
    pub fn storefront_defaults() -> Self {
        Self::new(vec![
            OrderRule {
                id: RuleId::new(1),
                description: "Carts may hold at most 3 items".to_string(),
                criteria: RuleCriteria::MaxItems {
                    max_items: 3,
                    scope: MaxItemsScope::CartTotal,
                },
                message: "exceeds max item count of {limit} (cart has {actual})".to_string(),
            },
            OrderRule {
                id: RuleId::new(2),
                description: "Carts may weigh at most 10kg".to_string(),
                criteria: RuleCriteria::MaxWeight { max_weight: 10.0 },
                message: "exceeds max weight of {limit}kg (cart weighs {actual}kg)".to_string(),
            },
            OrderRule {
                id: RuleId::new(3),
                description: "Liquid and gaseous products cannot ship together".to_string(),
                criteria: RuleCriteria::IncompatibleTypes {
                    incompatible_types: ["Liquid".to_string(), "Gaseous".to_string()]
                        .into_iter()
                        .collect(),
                },
                message: "incompatible product types in the same cart: {types}".to_string(),
            },
        ])
    }
}

/// The result of a cart failing one check: the originating rule (if any)
/// and a rendered, user-facing message.
///
/// Built-in checks (unknown product, insufficient stock, empty cart) have
/// no originating rule and carry `rule_id: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// The violated rule, or None for built-in checks.
    pub rule_id: Option<RuleId>,

    /// Rendered message with observed values substituted.
    pub message: String,
}

impl Violation {
    /// Creates a violation for a configured rule, rendering its template.
    pub(crate) fn of_rule(rule: &OrderRule, substitutions: &[(&str, String)]) -> Self {
        Self {
            rule_id: Some(rule.id),
            message: render(&rule.message, substitutions),
        }
    }

    /// Creates a violation for a built-in check.
    pub(crate) fn builtin(message: impl Into<String>) -> Self {
        Self {
            rule_id: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.rule_id {
            Some(rule_id) => write!(f, "rule {}: {}", rule_id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Substitutes `{key}` placeholders in a message template.
fn render(template: &str, substitutions: &[(&str, String)]) -> String {
    let mut message = template.to_string();
    for (key, value) in substitutions {
        message = message.replace(&format!("{{{key}}}"), value);
    }
    message
}

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How a markup rule adjusts the supplier price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Percentage,
    Absolute,
}

/// Price-range-conditioned markup: applies when the supplier price falls
/// inside the inclusive `[lower_bound, upper_bound]` range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupRule {
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub adjustment_type: Adjustment,
    pub adjustment_value: Decimal,
}

impl MarkupRule {
    /// Pass-through rule: sale price equals supplier price (rounded)
    pub fn identity() -> Self {
        Self {
            lower_bound: Decimal::MIN,
            upper_bound: Decimal::MAX,
            adjustment_type: Adjustment::Percentage,
            adjustment_value: Decimal::ZERO,
        }
    }

    pub fn contains(&self, supplier_price: Decimal) -> bool {
        self.lower_bound <= supplier_price && supplier_price <= self.upper_bound
    }

    /// Applies the adjustment and rounds to the nearest integer, half away
    /// from zero. Negative results are not guarded.
    pub fn apply(&self, supplier_price: Decimal) -> Decimal {
        let adjusted = match self.adjustment_type {
            Adjustment::Percentage => {
                supplier_price * (Decimal::ONE + self.adjustment_value / Decimal::ONE_HUNDRED)
            }
            Adjustment::Absolute => supplier_price + self.adjustment_value,
        };
        adjusted.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Ordered rule list plus the fallback applied when no rule matches
#[derive(Debug, Clone)]
pub struct PricingRules {
    pub rules: Vec<MarkupRule>,
    pub default_rule: MarkupRule,
}

impl PricingRules {
    /// First matching rule wins; the default rule applies otherwise.
    pub fn sale_price(&self, supplier_price: Decimal) -> Decimal {
        self.rules
            .iter()
            .find(|rule| rule.contains(supplier_price))
            .unwrap_or(&self.default_rule)
            .apply(supplier_price)
    }
}

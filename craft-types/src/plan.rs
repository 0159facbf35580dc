use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::feature::FeatureKind;

/// Monthly price of a plan tier, in minor units of the tagged currency
/// (e.g. cents for "usd"), matching the convention of the payment
/// provider the billing layer integrates with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PlanPrice {
    /// Amount in minor currency units
    pub amount_cents: u64,
    /// Lowercase ISO 4217 currency code
    pub currency: String,
}

impl PlanPrice {
    pub fn usd(amount_cents: u64) -> Self {
        Self {
            amount_cents,
            currency: "usd".to_string(),
        }
    }
}

/// A subscription tier: fixed monthly price and one usage cap per
/// metered feature
///
/// Tiers are defined at process start and never mutated. A limit of 0
/// means the feature is unavailable on that tier; there is no sentinel
/// for unlimited usage, every cap is finite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PlanTier {
    /// Unique tier key, e.g. "starter"
    pub id: String,
    /// Human-readable tier name shown in upgrade prompts
    pub display_name: String,
    /// Monthly subscription price
    pub monthly_price: PlanPrice,
    /// Per-feature usage caps for one billing period
    pub limits: BTreeMap<FeatureKind, u64>,
}

impl PlanTier {
    /// Usage cap for a feature on this tier. Catalog construction
    /// guarantees an entry for every `FeatureKind`; an absent entry is
    /// treated as feature-unavailable.
    pub fn limit(&self, feature: FeatureKind) -> u64 {
        self.limits.get(&feature).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_reads_as_unavailable() {
        let tier = PlanTier {
            id: "bare".to_string(),
            display_name: "Bare".to_string(),
            monthly_price: PlanPrice::usd(0),
            limits: BTreeMap::new(),
        };
        assert_eq!(tier.limit(FeatureKind::Campaigns), 0);
    }
}

//! Plan catalog for subscription tiers
//!
//! This module provides:
//! 1. Load-time validation of the tier table
//! 2. Price-ordered tier lookup
//! 3. Upgrade-path ("next tier") computation
//!
//! The catalog is the single source of truth for tier ordering and
//! upgrade recommendations; no caller re-derives them by sorting plan
//! entries inline.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

use craft_types::{FeatureKind, PlanPrice, PlanTier};

use crate::errors::{CatalogError, EntitlementError};

static STANDARD: Lazy<PlanCatalog> = Lazy::new(|| {
    PlanCatalog::new(vec![
        tier(
            "starter",
            "Starter",
            2900,
            [
                (FeatureKind::Personas, 5),
                (FeatureKind::ToneAnalyses, 10),
                (FeatureKind::ContentGeneration, 50),
                (FeatureKind::Campaigns, 2),
            ],
        ),
        tier(
            "professional",
            "Professional",
            7900,
            [
                (FeatureKind::Personas, 25),
                (FeatureKind::ToneAnalyses, 50),
                (FeatureKind::ContentGeneration, 250),
                (FeatureKind::Campaigns, 10),
            ],
        ),
        tier(
            "premium",
            "Premium",
            19900,
            [
                (FeatureKind::Personas, 100),
                (FeatureKind::ToneAnalyses, 200),
                (FeatureKind::ContentGeneration, 1000),
                (FeatureKind::Campaigns, 50),
            ],
        ),
    ])
    .expect("standard catalog is internally consistent")
});

fn tier(
    id: &str,
    display_name: &str,
    amount_cents: u64,
    limits: [(FeatureKind, u64); 4],
) -> PlanTier {
    PlanTier {
        id: id.to_string(),
        display_name: display_name.to_string(),
        monthly_price: PlanPrice::usd(amount_cents),
        limits: BTreeMap::from(limits),
    }
}

/// Immutable table of subscription tiers, held in ascending order of
/// monthly price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    tiers: Vec<PlanTier>,
}

impl PlanCatalog {
    /// Build a catalog from a tier table, validating it first: every
    /// tier must define a limit for every `FeatureKind` and tier ids
    /// must be unique. The sort by price is stable, so tiers priced
    /// equally keep their given order.
    pub fn new(mut tiers: Vec<PlanTier>) -> Result<Self, CatalogError> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for tier in &tiers {
            if !seen.insert(tier.id.clone()) {
                return Err(CatalogError::DuplicateTier(tier.id.clone()));
            }
            for feature in FeatureKind::ALL {
                if !tier.limits.contains_key(&feature) {
                    return Err(CatalogError::MissingLimit {
                        plan_id: tier.id.clone(),
                        feature,
                    });
                }
            }
        }
        tiers.sort_by_key(|t| t.monthly_price.amount_cents);
        Ok(Self { tiers })
    }

    /// The built-in starter/professional/premium tier table
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// All tiers, ascending by monthly price
    pub fn tiers(&self) -> impl Iterator<Item = &PlanTier> {
        self.tiers.iter()
    }

    /// Look up a tier by id
    pub fn get_tier(&self, id: &str) -> Result<&PlanTier, EntitlementError> {
        self.tiers
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EntitlementError::UnknownPlan {
                plan_id: id.to_string(),
            })
    }

    /// The cheapest tier priced strictly above `current` whose cap for
    /// `feature` strictly exceeds the current cap, if any tier offers
    /// one. Scans the price order, never the enumeration order.
    pub fn next_tier(&self, current: &PlanTier, feature: FeatureKind) -> Option<&PlanTier> {
        let current_limit = current.limit(feature);
        self.tiers
            .iter()
            .filter(|t| t.monthly_price.amount_cents > current.monthly_price.amount_cents)
            .find(|t| t.limit(feature) > current_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(n: u64) -> BTreeMap<FeatureKind, u64> {
        FeatureKind::ALL.iter().map(|f| (*f, n)).collect()
    }

    fn plain_tier(id: &str, price: u64, caps: BTreeMap<FeatureKind, u64>) -> PlanTier {
        PlanTier {
            id: id.to_string(),
            display_name: id.to_string(),
            monthly_price: PlanPrice::usd(price),
            limits: caps,
        }
    }

    #[test]
    fn standard_catalog_is_price_ordered() {
        let catalog = PlanCatalog::standard();
        let ids: Vec<&str> = catalog.tiers().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["starter", "professional", "premium"]);
    }

    #[test]
    fn missing_limit_fails_at_load() {
        let mut caps = limits(5);
        caps.remove(&FeatureKind::Campaigns);
        let result = PlanCatalog::new(vec![plain_tier("broken", 1000, caps)]);
        assert!(matches!(
            result,
            Err(CatalogError::MissingLimit {
                feature: FeatureKind::Campaigns,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_id_fails_at_load() {
        let result = PlanCatalog::new(vec![
            plain_tier("dup", 1000, limits(5)),
            plain_tier("dup", 2000, limits(10)),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateTier(id)) if id == "dup"));
    }

    #[test]
    fn next_tier_ignores_given_order() {
        // Tiers handed over most-expensive first; the scan still picks
        // the cheapest qualifying tier by price
        let catalog = PlanCatalog::new(vec![
            plain_tier("big", 5000, limits(100)),
            plain_tier("mid", 3000, limits(20)),
            plain_tier("small", 1000, limits(5)),
        ])
        .unwrap();
        let small = catalog.get_tier("small").unwrap();
        let next = catalog.next_tier(small, FeatureKind::Personas).unwrap();
        assert_eq!(next.id, "mid");
    }

    #[test]
    fn next_tier_skips_pricier_tiers_without_more_capacity() {
        // "mid" costs more but offers no extra personas capacity, so
        // the recommendation jumps to "big"
        let mut mid_caps = limits(5);
        mid_caps.insert(FeatureKind::Campaigns, 20);
        let catalog = PlanCatalog::new(vec![
            plain_tier("small", 1000, limits(5)),
            plain_tier("mid", 3000, mid_caps),
            plain_tier("big", 5000, limits(100)),
        ])
        .unwrap();
        let small = catalog.get_tier("small").unwrap();
        let next = catalog.next_tier(small, FeatureKind::Personas).unwrap();
        assert_eq!(next.id, "big");
    }

    #[test]
    fn top_tier_has_no_next() {
        let catalog = PlanCatalog::standard();
        let premium = catalog.get_tier("premium").unwrap();
        assert!(catalog.next_tier(premium, FeatureKind::Campaigns).is_none());
    }

    #[test]
    fn unknown_tier_is_an_error() {
        let catalog = PlanCatalog::standard();
        assert!(matches!(
            catalog.get_tier("enterprise"),
            Err(EntitlementError::UnknownPlan { plan_id }) if plan_id == "enterprise"
        ));
    }
}

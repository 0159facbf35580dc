//! Entitlement engine: admit/deny decisions for metered actions
//!
//! This module provides:
//! 1. Probe checks that evaluate without consuming
//! 2. Reservations that atomically consume one unit of a feature cap
//! 3. Upgrade-path data on every denial
//!
//! The engine holds no per-account state of its own; every decision is
//! made against a freshly read ledger value, so it is safe to share one
//! engine across concurrent requests for any number of accounts.

use std::sync::Arc;

use craft_types::{EntitlementDecision, FeatureKind, PlanTier};

use crate::errors::EntitlementError;
use crate::ledger::UsageLedger;
use crate::plans::PlanCatalog;

/// Whether a check should consume a unit of the cap on success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Evaluate only; never mutates the ledger
    Probe,
    /// Evaluate and, on admit, increment the ledger
    Reserve,
}

/// Decides whether a metered action may proceed for an account
pub struct EntitlementEngine {
    catalog: Arc<PlanCatalog>,
    ledger: Arc<dyn UsageLedger>,
}

impl EntitlementEngine {
    pub fn new(catalog: Arc<PlanCatalog>, ledger: Arc<dyn UsageLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// The ordered tier table backing this engine's recommendations
    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Check whether `account_id` may perform one `feature` action and,
    /// in [`CheckMode::Reserve`], consume a unit of the cap on admit.
    ///
    /// A tier with a cap of N admits exactly N reservations per period:
    /// `used == limit` already denies. Denials come back as data with
    /// the upgrade path filled in; errors mean the decision could not
    /// be made at all and must not be rendered as a limit dialog.
    pub async fn check_and_maybe_reserve(
        &self,
        account_id: &str,
        feature: FeatureKind,
        mode: CheckMode,
    ) -> Result<EntitlementDecision, EntitlementError> {
        let plan_id = self.ledger.plan_id(account_id).await?;
        let tier = match self.catalog.get_tier(&plan_id) {
            Ok(tier) => tier,
            Err(err) => {
                log::warn!(
                    "Account {} references plan {} which is not in the catalog",
                    account_id,
                    plan_id
                );
                return Err(err);
            }
        };
        let limit = tier.limit(feature);
        let used = self.ledger.get_usage(account_id, feature).await?;

        if used >= limit {
            log::warn!(
                "Account {} reached its {} limit ({} of {}) on plan {}",
                account_id,
                feature,
                used,
                limit,
                tier.id
            );
            return Ok(self.denial(tier, feature, used));
        }

        match mode {
            CheckMode::Probe => Ok(EntitlementDecision::Allowed {
                remaining: limit - used,
            }),
            CheckMode::Reserve => {
                match self
                    .ledger
                    .increment_usage(account_id, feature, limit)
                    .await?
                {
                    Some(new_value) => {
                        log::debug!(
                            "Account {} reserved {} ({} of {})",
                            account_id,
                            feature,
                            new_value,
                            limit
                        );
                        Ok(EntitlementDecision::Allowed {
                            remaining: limit - new_value,
                        })
                    }
                    // A concurrent reservation filled the cap between
                    // the read and the increment; re-read so the denial
                    // reports the value that beat us
                    None => {
                        let used = self.ledger.get_usage(account_id, feature).await?;
                        Ok(self.denial(tier, feature, used))
                    }
                }
            }
        }
    }

    fn denial(&self, tier: &PlanTier, feature: FeatureKind, used: u64) -> EntitlementDecision {
        EntitlementDecision::LimitReached {
            current_usage: used,
            limit: tier.limit(feature),
            current_plan_id: tier.id.clone(),
            next_tier: self.catalog.next_tier(tier, feature).cloned(),
        }
    }
}

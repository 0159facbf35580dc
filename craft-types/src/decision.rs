use serde::{Deserialize, Serialize};

use crate::plan::PlanTier;

/// Outcome of an entitlement check for one metered action
///
/// A denial is an expected, first-class result of the decision
/// function, never an error: it carries everything the presentation
/// layer needs to render a limit-reached state and, when one exists,
/// an upgrade call-to-action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntitlementDecision {
    /// The action may proceed; `remaining` is the number of
    /// reservations the period still has available after this decision
    Allowed {
        remaining: u64,
    },
    /// The account is at or over its cap for the feature
    LimitReached {
        /// Counter value observed at decision time
        current_usage: u64,
        /// Cap on the account's current tier
        limit: u64,
        /// Tier the account is on
        current_plan_id: String,
        /// Cheapest tier with a strictly higher cap for the feature,
        /// if any tier offers one
        next_tier: Option<PlanTier>,
    },
}

impl EntitlementDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EntitlementDecision::Allowed { .. })
    }
}

//! Escalation interface for denied decisions
//!
//! The engine never calls into presentation code; callers hand denied
//! decisions to an [`EscalationSink`] and the presentation layer
//! projects them into limit dialogs. [`UpgradePrompt`] is that
//! projection, computed purely from the decision value.

use serde::{Deserialize, Serialize};

use craft_types::{EntitlementDecision, FeatureKind};

/// What to offer an account that hit a feature cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradePrompt {
    /// A higher tier lifts the cap; `additional_capacity` is how many
    /// more actions per period the recommended tier allows
    Upgrade {
        tier_id: String,
        tier_name: String,
        additional_capacity: u64,
    },
    /// The account is already on the highest tier offering this
    /// feature; there is nothing to sell
    AtCeiling,
}

impl UpgradePrompt {
    /// Project a decision into an upgrade prompt. Allowed decisions
    /// have no prompt.
    pub fn from_decision(
        feature: FeatureKind,
        decision: &EntitlementDecision,
    ) -> Option<UpgradePrompt> {
        match decision {
            EntitlementDecision::Allowed { .. } => None,
            EntitlementDecision::LimitReached {
                limit, next_tier, ..
            } => Some(match next_tier {
                Some(tier) => UpgradePrompt::Upgrade {
                    tier_id: tier.id.clone(),
                    tier_name: tier.display_name.clone(),
                    additional_capacity: tier.limit(feature).saturating_sub(*limit),
                },
                None => UpgradePrompt::AtCeiling,
            }),
        }
    }
}

/// Sink the calling layer registers to hear about denials
pub trait EscalationSink: Send + Sync {
    fn limit_reached(&self, account_id: &str, feature: FeatureKind, decision: &EntitlementDecision);
}

/// Reference sink that records denials in the operational log
pub struct LogEscalation;

impl EscalationSink for LogEscalation {
    fn limit_reached(
        &self,
        account_id: &str,
        feature: FeatureKind,
        decision: &EntitlementDecision,
    ) {
        match UpgradePrompt::from_decision(feature, decision) {
            Some(UpgradePrompt::Upgrade {
                tier_name,
                additional_capacity,
                ..
            }) => {
                log::warn!(
                    "Account {} reached its {} limit; {} adds {} more per period",
                    account_id,
                    feature,
                    tier_name,
                    additional_capacity
                );
            }
            Some(UpgradePrompt::AtCeiling) => {
                log::warn!(
                    "Account {} reached its {} limit on the highest tier",
                    account_id,
                    feature
                );
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craft_types::{PlanPrice, PlanTier};
    use std::collections::BTreeMap;

    fn denied_with_next() -> EntitlementDecision {
        EntitlementDecision::LimitReached {
            current_usage: 5,
            limit: 5,
            current_plan_id: "starter".to_string(),
            next_tier: Some(PlanTier {
                id: "professional".to_string(),
                display_name: "Professional".to_string(),
                monthly_price: PlanPrice::usd(7900),
                limits: BTreeMap::from([(FeatureKind::Personas, 25)]),
            }),
        }
    }

    #[test]
    fn upgrade_prompt_names_tier_and_gap() {
        let prompt =
            UpgradePrompt::from_decision(FeatureKind::Personas, &denied_with_next()).unwrap();
        assert_eq!(
            prompt,
            UpgradePrompt::Upgrade {
                tier_id: "professional".to_string(),
                tier_name: "Professional".to_string(),
                additional_capacity: 20,
            }
        );
    }

    #[test]
    fn ceiling_denial_has_no_upgrade() {
        let decision = EntitlementDecision::LimitReached {
            current_usage: 50,
            limit: 50,
            current_plan_id: "premium".to_string(),
            next_tier: None,
        };
        let prompt = UpgradePrompt::from_decision(FeatureKind::Campaigns, &decision);
        assert_eq!(prompt, Some(UpgradePrompt::AtCeiling));
    }

    #[test]
    fn allowed_decisions_have_no_prompt() {
        let decision = EntitlementDecision::Allowed { remaining: 3 };
        assert!(UpgradePrompt::from_decision(FeatureKind::Personas, &decision).is_none());
    }

    #[test]
    fn prompt_serializes_for_the_presentation_layer() {
        let prompt =
            UpgradePrompt::from_decision(FeatureKind::Personas, &denied_with_next()).unwrap();
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["kind"], "upgrade");
        assert_eq!(json["tier_name"], "Professional");
        assert_eq!(json["additional_capacity"], 20);
    }
}

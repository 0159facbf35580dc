//! Error taxonomy for entitlement checks
//!
//! A denied entitlement is not an error; it is returned as data. The
//! errors here signal data-consistency or availability problems that
//! the caller must surface as failures, never as limit dialogs.

use craft_types::FeatureKind;
use thiserror::Error;

/// Errors surfaced by the entitlement engine and the usage ledger
#[derive(Debug, Error)]
pub enum EntitlementError {
    /// The account references a plan tier absent from the catalog.
    /// Signals an upstream migration problem, not a user mistake.
    #[error("Unknown plan: {plan_id}")]
    UnknownPlan { plan_id: String },

    /// The ledger has no record for the account
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The ledger could not complete a read or write. Propagated to
    /// the caller unmodified; retry policy belongs to the calling layer.
    #[error("Usage ledger unavailable: {0}")]
    LedgerUnavailable(String),
}

/// Construction-time integrity failures of the plan catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A tier is missing a limit entry for a metered feature
    #[error("Plan tier {plan_id} defines no limit for {feature}")]
    MissingLimit {
        plan_id: String,
        feature: FeatureKind,
    },

    /// Two tiers share an id
    #[error("Duplicate plan tier id: {0}")]
    DuplicateTier(String),
}

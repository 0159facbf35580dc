//! Usage ledger: durable per-account consumption counters
//!
//! The engine treats the ledger as authoritative and re-reads it on
//! every decision. Implementations must serialize increments per
//! account/feature pair; the bounded increment is the primitive that
//! makes an admit decision and its reservation a single atomic step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

use craft_types::FeatureKind;

use crate::errors::EntitlementError;

/// Per-account consumption record for one billing period
///
/// Created with all counters at zero when the account is created,
/// incremented exactly once per successful reservation, and zeroed by
/// the billing-period reset. Counters never decrease otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUsage {
    /// Tier the account is subscribed to
    pub plan_id: String,
    /// One counter per metered feature
    pub counters: BTreeMap<FeatureKind, u64>,
    /// When the current billing period started
    pub period_start: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
}

impl AccountUsage {
    /// Fresh record on the given plan, all counters zero
    pub fn new(plan_id: String) -> Self {
        let now = Utc::now();
        Self {
            plan_id,
            counters: FeatureKind::ALL.iter().map(|f| (*f, 0)).collect(),
            period_start: now,
            created_at: now.timestamp(),
            updated_at: now.timestamp(),
        }
    }

    /// Counter value for a feature
    pub fn count(&self, feature: FeatureKind) -> u64 {
        self.counters.get(&feature).copied().unwrap_or(0)
    }
}

/// Contract the engine consumes for reading and reserving usage
///
/// Every method is a fresh read against the authoritative store; the
/// engine never caches across calls.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Plan the account is currently subscribed to
    async fn plan_id(&self, account_id: &str) -> Result<String, EntitlementError>;

    /// Current counter value for the account and feature
    async fn get_usage(
        &self,
        account_id: &str,
        feature: FeatureKind,
    ) -> Result<u64, EntitlementError>;

    /// Increment the counter, but only while it is below `cap`.
    ///
    /// Returns the new value, or `None` when the counter had already
    /// reached `cap` and was left untouched. Concurrent calls for the
    /// same account/feature pair must serialize: at most `cap` total
    /// increments can ever succeed within one period.
    async fn increment_usage(
        &self,
        account_id: &str,
        feature: FeatureKind,
        cap: u64,
    ) -> Result<Option<u64>, EntitlementError>;
}

/// In-process ledger backed by a mutex-guarded map
///
/// Suitable for tests and single-node deployments; a storage-backed
/// implementation supplies the same guarantees via an atomic counter
/// update at the storage layer.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: Mutex<HashMap<String, AccountUsage>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account on a plan with zeroed counters. Replaces
    /// any existing record for the id.
    pub async fn create_account(&self, account_id: &str, plan_id: &str) {
        let mut accounts = self.accounts.lock().await;
        accounts.insert(account_id.to_string(), AccountUsage::new(plan_id.to_string()));
    }

    /// Drop the account's record entirely
    pub async fn remove_account(&self, account_id: &str) -> bool {
        let mut accounts = self.accounts.lock().await;
        accounts.remove(account_id).is_some()
    }

    /// Move the account to a different plan. Counters carry over; only
    /// the period reset zeroes them.
    pub async fn set_plan(&self, account_id: &str, plan_id: &str) -> Result<(), EntitlementError> {
        let mut accounts = self.accounts.lock().await;
        let usage = accounts
            .get_mut(account_id)
            .ok_or_else(|| EntitlementError::AccountNotFound(account_id.to_string()))?;
        usage.plan_id = plan_id.to_string();
        usage.updated_at = Utc::now().timestamp();
        Ok(())
    }

    /// Billing-period rollover: zero every counter and stamp the new
    /// period start. Triggered by the billing layer, never the engine.
    pub async fn reset_period(&self, account_id: &str) -> Result<(), EntitlementError> {
        let mut accounts = self.accounts.lock().await;
        let usage = accounts
            .get_mut(account_id)
            .ok_or_else(|| EntitlementError::AccountNotFound(account_id.to_string()))?;
        let now = Utc::now();
        for count in usage.counters.values_mut() {
            *count = 0;
        }
        usage.period_start = now;
        usage.updated_at = now.timestamp();
        Ok(())
    }

    /// Snapshot of the account's record, if it exists
    pub async fn get_account(&self, account_id: &str) -> Option<AccountUsage> {
        let accounts = self.accounts.lock().await;
        accounts.get(account_id).cloned()
    }
}

#[async_trait]
impl UsageLedger for InMemoryLedger {
    async fn plan_id(&self, account_id: &str) -> Result<String, EntitlementError> {
        let accounts = self.accounts.lock().await;
        accounts
            .get(account_id)
            .map(|usage| usage.plan_id.clone())
            .ok_or_else(|| EntitlementError::AccountNotFound(account_id.to_string()))
    }

    async fn get_usage(
        &self,
        account_id: &str,
        feature: FeatureKind,
    ) -> Result<u64, EntitlementError> {
        let accounts = self.accounts.lock().await;
        accounts
            .get(account_id)
            .map(|usage| usage.count(feature))
            .ok_or_else(|| EntitlementError::AccountNotFound(account_id.to_string()))
    }

    async fn increment_usage(
        &self,
        account_id: &str,
        feature: FeatureKind,
        cap: u64,
    ) -> Result<Option<u64>, EntitlementError> {
        let mut accounts = self.accounts.lock().await;
        let usage = accounts
            .get_mut(account_id)
            .ok_or_else(|| EntitlementError::AccountNotFound(account_id.to_string()))?;
        let count = usage.counters.entry(feature).or_insert(0);
        if *count >= cap {
            return Ok(None);
        }
        *count += 1;
        let new_value = *count;
        usage.updated_at = Utc::now().timestamp();
        Ok(Some(new_value))
    }
}

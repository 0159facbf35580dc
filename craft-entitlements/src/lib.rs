pub mod errors;
pub mod plans;
pub mod ledger;
pub mod engine;
pub mod notify;

// Re-export key types for easier use
pub use engine::{CheckMode, EntitlementEngine};
pub use errors::{CatalogError, EntitlementError};
pub use ledger::{InMemoryLedger, UsageLedger};
pub use plans::PlanCatalog;

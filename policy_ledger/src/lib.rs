// Policy Ledger Library Entry Point

// Module declarations - expose all modules through the library
pub mod config;
pub mod core;
pub mod interfaces;
pub mod types;

// Re-export key components for easier access
pub use config::LedgerConfig;
pub use core::access::RoleRegistry;
pub use core::catalog::PolicyCatalog;
pub use core::claims::ClaimQueue;
pub use core::ledger::PolicyLedger;
pub use core::purchases::PurchaseRegistry;
pub use interfaces::token_face::{MemoryTokenLedger, TokenLedger};
pub use types::error::LedgerError;
pub use types::policy_types::{Claim, Policy, PolicyId, Principal, Purchase, TokenAmount};

/// Returns the version of the library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

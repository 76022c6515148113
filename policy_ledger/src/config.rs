//! Ledger configuration
//!
//! A ledger is parameterized by its owner principal and the account it
//! holds on the external token ledger. Embedders usually construct
//! [`LedgerConfig`] programmatically; deployments can load it from a TOML
//! file:
//!
//! ```toml
//! owner = "owner-account"
//! escrow_account = "policy-ledger-escrow"
//! ```

use std::path::Path;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::types::error::LedgerError;
use crate::types::policy_types::Principal;

/// Construction parameters for a [`crate::core::ledger::PolicyLedger`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The contract owner, fixed for the life of the ledger
    pub owner: Principal,
    /// Account on the token ledger that holds the escrowed funds
    pub escrow_account: Principal,
}

impl LedgerConfig {
    /// Load the configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| LedgerError::config("failed to read configuration file", e))?;

        settings
            .try_deserialize()
            .map_err(|e| LedgerError::config("failed to parse configuration", e))
    }
}

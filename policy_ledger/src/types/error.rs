use thiserror::Error;

use super::policy_types::{PolicyId, Principal, TokenAmount};

/// Unified error type for policy ledger operations
///
/// This enumeration encapsulates every error condition that a ledger
/// operation can surface, including the failures propagated unchanged from
/// the external token ledger. Every operation is all-or-nothing: when one of
/// these errors is returned, no registry or balance has been mutated.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller lacks the role required for the attempted operation
    #[error("unauthorized: {context}")]
    Unauthorized {
        /// Description of what was unauthorized
        context: String,
    },

    /// A referenced policy, purchase, or claim does not exist (or does not
    /// belong to the caller)
    #[error("{entity} not found{}", .details.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    NotFound {
        /// The type of entity that was not found
        entity: String,
        /// Additional details about the lookup
        details: Option<String>,
    },

    /// Malformed creation input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced policy has been removed from the catalog
    #[error("policy {0} is no longer active")]
    PolicyInactive(PolicyId),

    /// The caller already holds a live purchase of this policy
    #[error("policy {0} already purchased by caller")]
    AlreadyPurchased(PolicyId),

    /// A claim has already been submitted for this purchase
    #[error("claim already submitted for policy {0}")]
    AlreadyClaimed(PolicyId),

    /// A claim index does not address a pending claim
    #[error("claim index {index} out of range ({pending} pending)")]
    IndexOutOfRange {
        /// The index that was requested
        index: usize,
        /// Number of claims currently pending
        pending: usize,
    },

    /// Token ledger rejected a debit for lack of funds
    #[error("insufficient funds: account {account} holds {available}, requested {requested}")]
    InsufficientFunds {
        /// Account that was to be debited
        account: Principal,
        /// Balance currently held by the account
        available: TokenAmount,
        /// Amount the operation attempted to move
        requested: TokenAmount,
    },

    /// Token ledger rejected a pull for lack of allowance
    #[error("insufficient allowance: spender {spender} allowed {available} by {account}, requested {requested}")]
    InsufficientAllowance {
        /// Account whose funds were to be pulled
        account: Principal,
        /// Account attempting the pull
        spender: Principal,
        /// Allowance currently granted
        available: TokenAmount,
        /// Amount the operation attempted to pull
        requested: TokenAmount,
    },

    /// Configuration could not be loaded or deserialized
    #[error("configuration error: {context}")]
    Config {
        /// Description of the configuration failure
        context: String,
        /// Underlying loader error
        #[source]
        source: config::ConfigError,
    },
}

impl LedgerError {
    /// Creates a new unauthorized access error
    ///
    /// # Arguments
    /// * `context` - Description of what was unauthorized
    pub fn unauthorized(context: impl Into<String>) -> Self {
        LedgerError::Unauthorized {
            context: context.into(),
        }
    }

    /// Creates a new entity-not-found error
    ///
    /// # Arguments
    /// * `entity` - The type of entity that was not found
    /// * `details` - Optional details about the failed lookup
    pub fn not_found(entity: impl Into<String>, details: Option<impl Into<String>>) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            details: details.map(|d| d.into()),
        }
    }

    /// Creates a new invalid argument error
    ///
    /// # Arguments
    /// * `message` - Description of the malformed input
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument(message.into())
    }

    /// Creates a new insufficient funds error
    ///
    /// # Arguments
    /// * `account` - Account that was to be debited
    /// * `available` - Balance currently held
    /// * `requested` - Amount the operation attempted to move
    pub fn insufficient_funds(
        account: impl Into<Principal>,
        available: TokenAmount,
        requested: TokenAmount,
    ) -> Self {
        LedgerError::InsufficientFunds {
            account: account.into(),
            available,
            requested,
        }
    }

    /// Creates a new insufficient allowance error
    ///
    /// # Arguments
    /// * `account` - Account whose funds were to be pulled
    /// * `spender` - Account attempting the pull
    /// * `available` - Allowance currently granted
    /// * `requested` - Amount the operation attempted to pull
    pub fn insufficient_allowance(
        account: impl Into<Principal>,
        spender: impl Into<Principal>,
        available: TokenAmount,
        requested: TokenAmount,
    ) -> Self {
        LedgerError::InsufficientAllowance {
            account: account.into(),
            spender: spender.into(),
            available,
            requested,
        }
    }

    /// Creates a new configuration error
    ///
    /// # Arguments
    /// * `context` - Description of the configuration failure
    /// * `source` - Underlying loader error
    pub fn config(context: impl Into<String>, source: config::ConfigError) -> Self {
        LedgerError::Config {
            context: context.into(),
            source,
        }
    }

    /// Returns true if this error was propagated from the token ledger
    pub fn is_ledger_failure(&self) -> bool {
        matches!(
            self,
            LedgerError::InsufficientFunds { .. } | LedgerError::InsufficientAllowance { .. }
        )
    }
}

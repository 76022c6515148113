//! Policy ledger data types
//!
//! This module defines the record types held by the ledger state machine:
//! - Catalog policies (offer templates)
//! - Purchases (per-buyer escrowed instances of a policy)
//! - Claims (pending payout requests)
//!
//! Records are never physically deleted. Policies carry an `active` flag and
//! purchases a `removed` flag; "active" views filter on those flags so that
//! identifiers stay stable for the life of the ledger.

use serde::{Deserialize, Serialize};

/// Account identifier on the external token ledger
// Replacing Address with String for compatibility
pub type Principal = String;

/// Token amount with ledger-defined decimal precision
///
/// Amounts are opaque to the core: the external ledger fixes the decimal
/// scale and the core never assumes one.
pub type TokenAmount = u64;

/// Catalog policy identifier, assigned sequentially and never reused
pub type PolicyId = u64;

/// A policy offering registered in the catalog
///
/// Immutable after creation except for `active`, which is cleared when the
/// owner removes the policy from sale. Removal is catalog-level only: it
/// never alters purchases already made against the policy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    /// Unique identifier, stable once assigned
    pub id: PolicyId,
    /// Display name, non-empty
    pub name: String,
    /// Token amount escrowed on purchase
    pub cost: TokenAmount,
    /// Free-text description of the coverage
    pub description: String,
    /// False once removed by the owner
    pub active: bool,
}

/// A buyer's purchased instance of a catalog policy
///
/// The purchase weakly references its policy by id; policies are only ever
/// deactivated, never deleted, so the reference cannot dangle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Purchase {
    /// Catalog policy this purchase instantiates
    pub policy_id: PolicyId,
    /// Buyer who paid the escrow
    pub buyer: Principal,
    /// Snapshot of the policy cost at purchase time
    pub escrowed_amount: TokenAmount,
    /// True once a claim has been submitted for this purchase
    pub claimed: bool,
    /// True once the claim is resolved; terminal
    pub removed: bool,
}

impl Purchase {
    /// True while the purchase backs live coverage
    pub fn is_active(&self) -> bool {
        !self.removed
    }
}

/// A pending claim against a purchased policy
///
/// Existence in the pending queue is what makes a claim pending; resolution
/// removes the entry entirely and no history is retained.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claim {
    /// Policy the claim is made against
    pub policy_id: PolicyId,
    /// Buyer who submitted the claim
    pub sender: Principal,
    /// Submission timestamp (Unix seconds)
    pub submitted_at: u64,
}

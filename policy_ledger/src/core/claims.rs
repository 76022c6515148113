//! Pending claims queue
//!
//! Dense, submission-ordered queue of unresolved claims. Resolution removes
//! an entry by index and compacts the queue, so index `i` always addresses
//! the `i`-th still-pending claim and callers re-fetch after each
//! resolution. Each entry carries the registry index of its purchase so
//! resolution can retire the right escrow record.

use serde::{Deserialize, Serialize};

use crate::core::purchases::PurchaseIndex;
use crate::types::error::LedgerError;
use crate::types::policy_types::Claim;

/// A pending claim together with its purchase registry index
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingClaim {
    /// The claim as exposed to callers
    pub claim: Claim,
    /// Registry index of the purchase under claim
    pub purchase: PurchaseIndex,
}

/// Dense queue of pending claims in submission order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimQueue {
    pending: Vec<PendingClaim>,
}

impl ClaimQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending claims
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if no claims are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Append a claim to the back of the queue
    pub fn push(&mut self, claim: Claim, purchase: PurchaseIndex) {
        self.pending.push(PendingClaim { claim, purchase });
    }

    /// The pending claim at `index` without removing it
    pub fn get(&self, index: usize) -> Result<&PendingClaim, LedgerError> {
        self.pending.get(index).ok_or(LedgerError::IndexOutOfRange {
            index,
            pending: self.pending.len(),
        })
    }

    /// Remove and return the claim at `index`, shifting later entries left
    pub fn remove(&mut self, index: usize) -> Result<PendingClaim, LedgerError> {
        if index >= self.pending.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                pending: self.pending.len(),
            });
        }
        Ok(self.pending.remove(index))
    }

    /// Snapshot of the pending claims in submission order
    pub fn claims(&self) -> Vec<Claim> {
        self.pending.iter().map(|p| p.claim.clone()).collect()
    }
}

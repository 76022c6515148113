//! Purchase registry
//!
//! Escrow book recording which buyer holds which purchased policy instance.
//! Purchases are appended in order and never physically deleted; resolution
//! of a claim marks its purchase `removed`, and all "active" views filter on
//! that flag. The registry also maintains the active escrow sum, which must
//! mirror the externally held escrow balance minus forfeits at all times.

use serde::{Deserialize, Serialize};

use crate::types::error::LedgerError;
use crate::types::policy_types::{PolicyId, Principal, Purchase, TokenAmount};

/// Stable index of a purchase within the registry
pub type PurchaseIndex = usize;

/// Append-only registry of purchases with escrow accounting
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PurchaseRegistry {
    /// Purchases in insertion order; indices are stable
    purchases: Vec<Purchase>,
    /// Sum of escrowed amounts over non-removed purchases
    active_escrow: TokenAmount,
}

impl PurchaseRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `buyer` holds a non-removed purchase of `policy_id`
    pub fn holds_active(&self, buyer: &Principal, policy_id: PolicyId) -> bool {
        self.find_active(buyer, policy_id).is_some()
    }

    /// Index of the buyer's non-removed purchase of `policy_id`, if any
    pub fn find_active(&self, buyer: &Principal, policy_id: PolicyId) -> Option<PurchaseIndex> {
        self.purchases
            .iter()
            .position(|p| p.policy_id == policy_id && p.buyer == *buyer && !p.removed)
    }

    /// Record a purchase with escrow already taken
    ///
    /// The caller must have completed the token pull before recording; the
    /// registry only does bookkeeping.
    pub fn record(
        &mut self,
        buyer: Principal,
        policy_id: PolicyId,
        escrowed_amount: TokenAmount,
    ) -> PurchaseIndex {
        let index = self.purchases.len();
        self.purchases.push(Purchase {
            policy_id,
            buyer,
            escrowed_amount,
            claimed: false,
            removed: false,
        });
        self.active_escrow += escrowed_amount;
        index
    }

    /// Purchase at `index`
    pub fn get(&self, index: PurchaseIndex) -> Result<&Purchase, LedgerError> {
        self.purchases
            .get(index)
            .ok_or_else(|| LedgerError::not_found("Purchase", Some(format!("purchase index {}", index))))
    }

    /// Mark the purchase at `index` as claimed
    ///
    /// Fails with `AlreadyClaimed` if a claim was already submitted for it.
    pub fn mark_claimed(&mut self, index: PurchaseIndex) -> Result<(), LedgerError> {
        let purchase = self.purchase_mut(index)?;
        if purchase.claimed {
            return Err(LedgerError::AlreadyClaimed(purchase.policy_id));
        }
        purchase.claimed = true;
        Ok(())
    }

    /// Retire the purchase at `index`, releasing its escrow from the active sum
    ///
    /// Terminal: called exactly once per purchase, on claim resolution.
    pub fn mark_removed(&mut self, index: PurchaseIndex) -> Result<TokenAmount, LedgerError> {
        let purchase = self.purchase_mut(index)?;
        if purchase.removed {
            return Err(LedgerError::not_found(
                "Purchase",
                Some(format!("purchase index {} already removed", index)),
            ));
        }
        purchase.removed = true;
        let released = purchase.escrowed_amount;
        self.active_escrow -= released;
        Ok(released)
    }

    /// Policy ids of the buyer's non-removed purchases, in purchase order
    pub fn active_policy_ids(&self, buyer: &Principal) -> Vec<PolicyId> {
        self.purchases
            .iter()
            .filter(|p| p.buyer == *buyer && !p.removed)
            .map(|p| p.policy_id)
            .collect()
    }

    /// Sum of escrowed amounts over non-removed purchases
    pub fn active_escrow(&self) -> TokenAmount {
        self.active_escrow
    }

    /// All purchases in insertion order, removed included
    pub fn all(&self) -> &[Purchase] {
        &self.purchases
    }

    fn purchase_mut(&mut self, index: PurchaseIndex) -> Result<&mut Purchase, LedgerError> {
        self.purchases
            .get_mut(index)
            .ok_or_else(|| LedgerError::not_found("Purchase", Some(format!("purchase index {}", index))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buyer() -> Principal {
        "buyer".to_string()
    }

    #[test]
    fn record_tracks_active_escrow() {
        let mut registry = PurchaseRegistry::new();
        registry.record(buyer(), 0, 10);
        registry.record(buyer(), 1, 5);
        assert_eq!(registry.active_escrow(), 15);
        assert_eq!(registry.active_policy_ids(&buyer()), vec![0, 1]);
    }

    #[test]
    fn removal_releases_escrow_once() {
        let mut registry = PurchaseRegistry::new();
        let index = registry.record(buyer(), 0, 10);

        assert_eq!(registry.mark_removed(index).unwrap(), 10);
        assert_eq!(registry.active_escrow(), 0);
        assert!(registry.active_policy_ids(&buyer()).is_empty());

        // A purchase retires exactly once
        assert!(registry.mark_removed(index).is_err());
    }

    #[test]
    fn claims_are_flagged_once() {
        let mut registry = PurchaseRegistry::new();
        let index = registry.record(buyer(), 0, 10);

        registry.mark_claimed(index).unwrap();
        let err = registry.mark_claimed(index).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyClaimed(0)));
    }

    #[test]
    fn active_lookup_ignores_removed_purchases() {
        let mut registry = PurchaseRegistry::new();
        let index = registry.record(buyer(), 0, 10);
        assert!(registry.holds_active(&buyer(), 0));

        registry.mark_removed(index).unwrap();
        assert!(!registry.holds_active(&buyer(), 0));

        // Re-purchase of the same policy id creates a fresh record
        registry.record(buyer(), 0, 10);
        assert!(registry.holds_active(&buyer(), 0));
    }
}

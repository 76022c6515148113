//! Policy ledger state container
//!
//! [`PolicyLedger`] owns all mutable registry state (roles, catalog,
//! purchases, pending claims, escrow counters) behind a single lock and
//! drives the external token ledger at the two points where funds move:
//! purchase (escrow pull) and claim approval (refund payout).
//!
//! Mutating operations hold the write guard for their full duration,
//! including the token ledger round trip. Operations are therefore
//! serialized and atomic with respect to each other, and no reentrant call
//! can observe or mutate partially-updated state while a transfer is
//! outstanding. Bookkeeping is only touched after the token call has
//! succeeded, so a ledger failure aborts the operation with nothing changed.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::core::access::RoleRegistry;
use crate::core::catalog::PolicyCatalog;
use crate::core::claims::ClaimQueue;
use crate::core::purchases::PurchaseRegistry;
use crate::interfaces::token_face::TokenLedger;
use crate::types::error::LedgerError;
use crate::types::policy_types::{Claim, Policy, PolicyId, Principal, TokenAmount};

/// Registry state guarded by the ledger's single lock
#[derive(Debug)]
struct LedgerState {
    roles: RoleRegistry,
    catalog: PolicyCatalog,
    purchases: PurchaseRegistry,
    claims: ClaimQueue,
    /// Total refunded to buyers over the ledger's lifetime
    refunded_total: TokenAmount,
    /// Total forfeited to the escrow account over the ledger's lifetime
    forfeited_total: TokenAmount,
}

/// The policy/claims ledger state machine
///
/// One instance is the single authority over its registries. All operations
/// authenticate the explicit `caller` principal; there is no ambient caller
/// identity.
pub struct PolicyLedger {
    /// Escrow account held by this ledger on the external token ledger
    escrow_account: Principal,
    /// External token ledger collaborator
    token: Arc<dyn TokenLedger>,
    state: RwLock<LedgerState>,
}

impl PolicyLedger {
    /// Create a ledger owned by `config.owner`, escrowing funds into
    /// `config.escrow_account` on `token`
    pub fn new(config: LedgerConfig, token: Arc<dyn TokenLedger>) -> Self {
        info!(owner = %config.owner, escrow = %config.escrow_account, "policy ledger created");
        Self {
            escrow_account: config.escrow_account,
            token,
            state: RwLock::new(LedgerState {
                roles: RoleRegistry::new(config.owner),
                catalog: PolicyCatalog::new(),
                purchases: PurchaseRegistry::new(),
                claims: ClaimQueue::new(),
                refunded_total: 0,
                forfeited_total: 0,
            }),
        }
    }

    /// The escrow account this ledger holds on the token ledger
    pub fn escrow_account(&self) -> &Principal {
        &self.escrow_account
    }

    /// The fixed owner principal
    pub fn owner(&self) -> Principal {
        self.state.read().roles.owner().clone()
    }

    // --- Access control ---

    /// True if `principal` may perform admin-gated operations
    pub fn is_admin(&self, principal: &Principal) -> bool {
        self.state.read().roles.is_admin(principal)
    }

    /// Grant admin capability; owner-only, idempotent
    pub fn add_admin(&self, caller: &Principal, principal: Principal) -> Result<(), LedgerError> {
        self.state.write().roles.add_admin(caller, principal)
    }

    /// Revoke admin capability; owner-only, idempotent
    pub fn remove_admin(&self, caller: &Principal, principal: &Principal) -> Result<(), LedgerError> {
        self.state.write().roles.remove_admin(caller, principal)
    }

    // --- Policy catalog ---

    /// Register a new policy offering; owner or admin
    pub fn add_policy(
        &self,
        caller: &Principal,
        name: &str,
        cost: TokenAmount,
        description: &str,
    ) -> Result<PolicyId, LedgerError> {
        let mut state = self.state.write();
        state.roles.require_admin(caller, "add policy")?;
        state.catalog.add(name, cost, description)
    }

    /// Deactivate a policy offering; owner-only
    ///
    /// Prevents future purchases of the id. Purchases already made are
    /// untouched and remain claimable.
    pub fn remove_policy(&self, caller: &Principal, id: PolicyId) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        state.roles.require_owner(caller, "remove policy")?;
        state.catalog.remove(id)
    }

    /// Look up a policy by id
    pub fn get_policy(&self, id: PolicyId) -> Result<Policy, LedgerError> {
        self.state.read().catalog.get(id).cloned()
    }

    /// Full catalog in id order, removed offerings included
    pub fn policies(&self) -> Vec<Policy> {
        self.state.read().catalog.all().to_vec()
    }

    // --- Purchase registry ---

    /// Purchase a policy, escrowing its cost from the caller
    ///
    /// Pulls `cost` from the buyer into the escrow account via the token
    /// ledger. If the pull fails the error propagates unchanged and no
    /// purchase record is created.
    pub fn buy_policy(&self, caller: &Principal, id: PolicyId) -> Result<(), LedgerError> {
        let mut state = self.state.write();

        let policy = state.catalog.get(id)?.clone();
        if !policy.active {
            return Err(LedgerError::PolicyInactive(id));
        }
        if state.purchases.holds_active(caller, id) {
            return Err(LedgerError::AlreadyPurchased(id));
        }

        self.token
            .transfer_from(caller, &self.escrow_account, policy.cost)?;
        state.purchases.record(caller.clone(), id, policy.cost);

        info!(buyer = %caller, policy_id = id, cost = policy.cost, "policy purchased");
        Ok(())
    }

    /// Policy data for the buyer's non-removed purchases, in purchase order
    pub fn get_active_purchased_policies(&self, buyer: &Principal) -> Vec<Policy> {
        let state = self.state.read();
        state
            .purchases
            .active_policy_ids(buyer)
            .into_iter()
            .filter_map(|id| state.catalog.get(id).ok())
            .cloned()
            .collect()
    }

    // --- Claims workflow ---

    /// Submit a claim against a purchased policy
    ///
    /// The caller must hold a non-removed purchase of `id` that has not been
    /// claimed yet. Enqueues the claim; no token movement at this step.
    pub fn submit_claim(&self, caller: &Principal, id: PolicyId) -> Result<(), LedgerError> {
        let mut state = self.state.write();

        let index = state.purchases.find_active(caller, id).ok_or_else(|| {
            LedgerError::not_found(
                "Purchase",
                Some(format!("no active purchase of policy {} held by {}", id, caller)),
            )
        })?;
        state.purchases.mark_claimed(index)?;

        let claim = Claim {
            policy_id: id,
            sender: caller.clone(),
            submitted_at: chrono::Utc::now().timestamp() as u64,
        };
        state.claims.push(claim, index);

        info!(sender = %caller, policy_id = id, "claim submitted");
        Ok(())
    }

    /// Pending claims in submission order, oldest first
    ///
    /// Indices shift after each resolution; callers re-fetch before
    /// addressing claims by position.
    pub fn get_claims(&self) -> Vec<Claim> {
        self.state.read().claims.claims()
    }

    /// Approve the pending claim at `index`, refunding its escrow; admin-gated
    ///
    /// Pays the claim's escrowed amount back to the sender out of the escrow
    /// account, retires the purchase, and removes the claim from the queue.
    /// A failed payout aborts with no state change.
    pub fn approve_claim(&self, caller: &Principal, index: usize) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        state.roles.require_admin(caller, "approve claim")?;

        let pending = state.claims.get(index)?.clone();
        let amount = state.purchases.get(pending.purchase)?.escrowed_amount;

        self.token
            .transfer(&self.escrow_account, &pending.claim.sender, amount)?;
        state.purchases.mark_removed(pending.purchase)?;
        state.claims.remove(index)?;
        state.refunded_total += amount;

        info!(
            sender = %pending.claim.sender,
            policy_id = pending.claim.policy_id,
            amount,
            "claim approved, escrow refunded"
        );
        Ok(())
    }

    /// Deny the pending claim at `index`, forfeiting its escrow; admin-gated
    ///
    /// No token movement: the escrow stays in the escrow account
    /// permanently. The purchase is retired and the claim removed from the
    /// queue with the same index-shift semantics as approval.
    pub fn deny_claim(&self, caller: &Principal, index: usize) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        state.roles.require_admin(caller, "deny claim")?;

        let pending = state.claims.get(index)?.clone();
        let amount = state.purchases.mark_removed(pending.purchase)?;
        state.claims.remove(index)?;
        state.forfeited_total += amount;

        info!(
            sender = %pending.claim.sender,
            policy_id = pending.claim.policy_id,
            amount,
            "claim denied, escrow forfeited"
        );
        Ok(())
    }

    // --- Escrow accounting diagnostics ---

    /// Sum of escrowed amounts over non-removed purchases
    ///
    /// Conservation invariant: the escrow account's balance on the token
    /// ledger equals `active_escrow() + forfeited_total()` whenever no
    /// operation is in flight (assuming nothing else pays into the account).
    pub fn active_escrow(&self) -> TokenAmount {
        self.state.read().purchases.active_escrow()
    }

    /// Total refunded to buyers over the ledger's lifetime
    pub fn refunded_total(&self) -> TokenAmount {
        self.state.read().refunded_total
    }

    /// Total escrow forfeited through denied claims
    pub fn forfeited_total(&self) -> TokenAmount {
        self.state.read().forfeited_total
    }

    /// Escrow account balance as reported by the token ledger
    pub fn escrow_balance(&self) -> TokenAmount {
        let balance = self.token.balance_of(&self.escrow_account);
        debug!(escrow = %self.escrow_account, balance, "escrow balance read");
        balance
    }
}

//! Token ledger interface
//!
//! The policy ledger never holds token balances itself; it drives an
//! external fungible-token ledger through the [`TokenLedger`] trait. The
//! core consumes exactly three operations: an allowance-gated pull at
//! purchase time, a direct transfer for refund payouts, and a balance read
//! used only for diagnostics.
//!
//! [`MemoryTokenLedger`] is the in-process reference implementation, used by
//! the test suites and by embedders that do not bridge to a real ledger.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::types::error::LedgerError;
use crate::types::policy_types::{Principal, TokenAmount};

/// External fungible-token ledger contract
///
/// Every call is a single atomic step: on `Err` nothing has moved, and the
/// caller must abort its own operation without mutating state. Failures are
/// surfaced as [`LedgerError::InsufficientFunds`] or
/// [`LedgerError::InsufficientAllowance`] and propagated unchanged.
pub trait TokenLedger: Send + Sync {
    /// Pull `amount` from `payer` to `payee`, consuming allowance granted by
    /// `payer` to `payee`
    fn transfer_from(
        &self,
        payer: &Principal,
        payee: &Principal,
        amount: TokenAmount,
    ) -> Result<(), LedgerError>;

    /// Move `amount` from `payer` to `payee` without an allowance check
    ///
    /// The core passes its own escrow account as `payer`; a trait has no
    /// ambient caller identity, so the debited account is explicit.
    fn transfer(
        &self,
        payer: &Principal,
        payee: &Principal,
        amount: TokenAmount,
    ) -> Result<(), LedgerError>;

    /// Current balance of `account`; diagnostics only, never an invariant
    fn balance_of(&self, account: &Principal) -> TokenAmount;
}

/// Balances and allowances held by a [`MemoryTokenLedger`]
#[derive(Debug, Default)]
struct MemoryLedgerState {
    /// Account balances
    balances: HashMap<Principal, TokenAmount>,
    /// Allowances keyed by (account, spender)
    allowances: HashMap<(Principal, Principal), TokenAmount>,
}

/// In-memory token ledger for tests and standalone deployments
///
/// Behaves like a minimal fungible-token contract: fixed decimal precision
/// recorded as metadata, balances, and (account, spender) allowances. The
/// policy ledger core treats amounts as opaque integers and never reads
/// `decimals`; it exists so a deployment can render amounts consistently.
pub struct MemoryTokenLedger {
    /// Decimal precision of the token, metadata only
    decimals: u8,
    state: RwLock<MemoryLedgerState>,
}

impl MemoryTokenLedger {
    /// Create an empty ledger with the given decimal precision
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            state: RwLock::new(MemoryLedgerState::default()),
        }
    }

    /// Decimal precision of this token
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Credit `amount` new tokens to `account`
    pub fn mint(&self, account: &Principal, amount: TokenAmount) {
        let mut state = self.state.write();
        let balance = state.balances.entry(account.clone()).or_insert(0);
        *balance += amount;
    }

    /// Grant `spender` the right to pull up to `amount` from `account`
    ///
    /// Overwrites any previous grant for the pair, matching the usual
    /// fungible-token approval semantics.
    pub fn approve(&self, account: &Principal, spender: &Principal, amount: TokenAmount) {
        let mut state = self.state.write();
        state
            .allowances
            .insert((account.clone(), spender.clone()), amount);
    }

    /// Remaining allowance granted by `account` to `spender`
    pub fn allowance(&self, account: &Principal, spender: &Principal) -> TokenAmount {
        let state = self.state.read();
        state
            .allowances
            .get(&(account.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Debit `payer` and credit `payee` on an already-locked state
    fn move_tokens(
        state: &mut MemoryLedgerState,
        payer: &Principal,
        payee: &Principal,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let available = state.balances.get(payer).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::insufficient_funds(
                payer.clone(),
                available,
                amount,
            ));
        }
        *state.balances.entry(payer.clone()).or_insert(0) -= amount;
        *state.balances.entry(payee.clone()).or_insert(0) += amount;
        Ok(())
    }
}

impl TokenLedger for MemoryTokenLedger {
    fn transfer_from(
        &self,
        payer: &Principal,
        payee: &Principal,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();

        let key = (payer.clone(), payee.clone());
        let allowed = state.allowances.get(&key).copied().unwrap_or(0);
        if allowed < amount {
            return Err(LedgerError::insufficient_allowance(
                payer.clone(),
                payee.clone(),
                allowed,
                amount,
            ));
        }

        Self::move_tokens(&mut state, payer, payee, amount)?;
        state.allowances.insert(key, allowed - amount);

        debug!(%payer, %payee, amount, "token pull executed");
        Ok(())
    }

    fn transfer(
        &self,
        payer: &Principal,
        payee: &Principal,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        Self::move_tokens(&mut state, payer, payee, amount)?;

        debug!(%payer, %payee, amount, "token transfer executed");
        Ok(())
    }

    fn balance_of(&self, account: &Principal) -> TokenAmount {
        let state = self.state.read();
        state.balances.get(account).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> Principal {
        name.to_string()
    }

    #[test]
    fn mint_and_balance() {
        let ledger = MemoryTokenLedger::new(6);
        let alice = account("alice");

        assert_eq!(ledger.balance_of(&alice), 0);
        ledger.mint(&alice, 1_000_000);
        assert_eq!(ledger.balance_of(&alice), 1_000_000);
    }

    #[test]
    fn transfer_moves_funds() {
        let ledger = MemoryTokenLedger::new(0);
        let alice = account("alice");
        let bob = account("bob");
        ledger.mint(&alice, 100);

        ledger.transfer(&alice, &bob, 40).unwrap();
        assert_eq!(ledger.balance_of(&alice), 60);
        assert_eq!(ledger.balance_of(&bob), 40);
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let ledger = MemoryTokenLedger::new(0);
        let alice = account("alice");
        let bob = account("bob");
        ledger.mint(&alice, 10);

        let err = ledger.transfer(&alice, &bob, 11).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // Nothing moved
        assert_eq!(ledger.balance_of(&alice), 10);
        assert_eq!(ledger.balance_of(&bob), 0);
    }

    #[test]
    fn transfer_from_requires_allowance() {
        let ledger = MemoryTokenLedger::new(0);
        let alice = account("alice");
        let escrow = account("escrow");
        ledger.mint(&alice, 100);

        let err = ledger.transfer_from(&alice, &escrow, 50).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));

        ledger.approve(&alice, &escrow, 60);
        ledger.transfer_from(&alice, &escrow, 50).unwrap();
        assert_eq!(ledger.balance_of(&escrow), 50);
        assert_eq!(ledger.allowance(&alice, &escrow), 10);
    }

    #[test]
    fn allowance_does_not_cover_missing_funds() {
        let ledger = MemoryTokenLedger::new(0);
        let alice = account("alice");
        let escrow = account("escrow");
        ledger.approve(&alice, &escrow, 100);

        let err = ledger.transfer_from(&alice, &escrow, 100).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // Allowance untouched by the failed pull
        assert_eq!(ledger.allowance(&alice, &escrow), 100);
    }
}

//! Policy catalog
//!
//! Registry of policy offerings. Identifiers are assigned sequentially and
//! stay stable forever: removal only clears the `active` flag, so an id is
//! never reused and purchase records referencing it never dangle.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::error::LedgerError;
use crate::types::policy_types::{Policy, PolicyId, TokenAmount};

/// Append-only arena of policy offerings, indexed by id
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyCatalog {
    /// Policies in id order; a policy's id is its position
    policies: Vec<Policy>,
}

impl PolicyCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new offering and return its id
    ///
    /// Degenerate offerings are rejected: the name must be non-empty and the
    /// cost strictly positive.
    pub fn add(
        &mut self,
        name: &str,
        cost: TokenAmount,
        description: &str,
    ) -> Result<PolicyId, LedgerError> {
        if name.is_empty() {
            return Err(LedgerError::invalid_argument("policy name must not be empty"));
        }
        if cost == 0 {
            return Err(LedgerError::invalid_argument("policy cost must be positive"));
        }

        let id = self.policies.len() as PolicyId;
        self.policies.push(Policy {
            id,
            name: name.to_string(),
            cost,
            description: description.to_string(),
            active: true,
        });

        info!(policy_id = id, name, cost, "policy added to catalog");
        Ok(id)
    }

    /// Deactivate an offering, preventing future purchases
    ///
    /// Existing purchases are untouched; removal is catalog-level only.
    pub fn remove(&mut self, id: PolicyId) -> Result<(), LedgerError> {
        let policy = self.policy_mut(id)?;
        policy.active = false;

        info!(policy_id = id, "policy removed from catalog");
        Ok(())
    }

    /// Look up a policy by id
    pub fn get(&self, id: PolicyId) -> Result<&Policy, LedgerError> {
        self.policies
            .get(id as usize)
            .ok_or_else(|| LedgerError::not_found("Policy", Some(format!("policy id {}", id))))
    }

    /// All registered policies in id order, active or not
    pub fn all(&self) -> &[Policy] {
        &self.policies
    }

    fn policy_mut(&mut self, id: PolicyId) -> Result<&mut Policy, LedgerError> {
        self.policies
            .get_mut(id as usize)
            .ok_or_else(|| LedgerError::not_found("Policy", Some(format!("policy id {}", id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_stable() {
        let mut catalog = PolicyCatalog::new();
        let first = catalog.add("O1", 10, "first").unwrap();
        let second = catalog.add("B1", 5, "second").unwrap();
        assert_eq!(first, 0);
        assert_eq!(second, 1);

        // Removal keeps the id assigned; the next policy still gets a fresh id
        catalog.remove(first).unwrap();
        let third = catalog.add("C1", 7, "third").unwrap();
        assert_eq!(third, 2);
        assert_eq!(catalog.get(first).unwrap().name, "O1");
    }

    #[test]
    fn degenerate_offerings_are_rejected() {
        let mut catalog = PolicyCatalog::new();
        assert!(matches!(
            catalog.add("", 10, "no name").unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
        assert!(matches!(
            catalog.add("Zero", 0, "free").unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
        assert!(catalog.all().is_empty());
    }

    #[test]
    fn remove_clears_active_only() {
        let mut catalog = PolicyCatalog::new();
        let id = catalog.add("O1", 10, "d").unwrap();

        catalog.remove(id).unwrap();
        let policy = catalog.get(id).unwrap();
        assert!(!policy.active);
        assert_eq!(policy.cost, 10);

        assert!(matches!(
            catalog.remove(99).unwrap_err(),
            LedgerError::NotFound { .. }
        ));
    }
}

//! Access policy: owner principal, minter roles, and the transfer-from
//! allowance table.
//!
//! The ledger core checks these as preconditions; the policy itself holds no
//! balances. A single owner grants and revokes minter authorization and is
//! the only principal allowed to lower the global rate.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::account::Amount;
use crate::error::{LedgerError, Result};

/// Address-like principal identifier.
pub type PrincipalId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessPolicy {
    owner: PrincipalId,
    minters: HashSet<PrincipalId>,
    /// holder -> spender -> approved amount
    allowances: HashMap<PrincipalId, HashMap<PrincipalId, Amount>>,
}

impl AccessPolicy {
    pub fn new(owner: impl Into<PrincipalId>) -> Self {
        Self {
            owner: owner.into(),
            minters: HashSet::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn is_minter(&self, principal: &str) -> bool {
        self.minters.contains(principal)
    }

    pub fn require_owner(&self, caller: &str) -> Result<()> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized {
                caller: caller.to_string(),
                required: "owner",
            });
        }
        Ok(())
    }

    pub fn require_minter(&self, caller: &str) -> Result<()> {
        if !self.minters.contains(caller) {
            return Err(LedgerError::Unauthorized {
                caller: caller.to_string(),
                required: "minter",
            });
        }
        Ok(())
    }

    /// Owner-gated. Granting an existing minter is a no-op.
    pub fn grant_minter(&mut self, caller: &str, who: &str) -> Result<()> {
        self.require_owner(caller)?;
        self.minters.insert(who.to_string());
        Ok(())
    }

    /// Owner-gated. Revoking a non-minter is a no-op.
    pub fn revoke_minter(&mut self, caller: &str, who: &str) -> Result<()> {
        self.require_owner(caller)?;
        self.minters.remove(who);
        Ok(())
    }

    /// Replace the holder's approval for `spender`. Zero clears the entry.
    pub fn approve(&mut self, holder: &str, spender: &str, amount: Amount) {
        let spenders = self.allowances.entry(holder.to_string()).or_default();
        if amount == 0 {
            spenders.remove(spender);
        } else {
            spenders.insert(spender.to_string(), amount);
        }
    }

    pub fn allowance(&self, holder: &str, spender: &str) -> Amount {
        self.allowances
            .get(holder)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Deduct a spent amount from an approval.
    pub fn consume_allowance(&mut self, holder: &str, spender: &str, amount: Amount) -> Result<()> {
        let approved = self.allowance(holder, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                spender: spender.to_string(),
                requested: amount,
                approved,
            });
        }
        self.approve(holder, spender, approved - amount);
        Ok(())
    }
}

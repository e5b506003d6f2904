//! Supply counters maintained across mints, burns, and accruals.

use serde::{Deserialize, Serialize};

use crate::account::Amount;

/// Running totals for the whole ledger. `principal_supply` tracks the sum of
/// all stored principals; interest materialized by reconciliation counts as
/// an implicit mint under `total_accrued`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyStats {
    pub total_minted: Amount,
    pub total_burned: Amount,
    pub total_accrued: Amount,
    pub principal_supply: Amount,
}

impl SupplyStats {
    pub(crate) fn record_mint(&mut self, amount: Amount) {
        self.total_minted = self.total_minted.saturating_add(amount);
        self.principal_supply = self.principal_supply.saturating_add(amount);
    }

    pub(crate) fn record_burn(&mut self, amount: Amount) {
        self.total_burned = self.total_burned.saturating_add(amount);
        self.principal_supply = self.principal_supply.saturating_sub(amount);
    }

    pub(crate) fn record_accrual(&mut self, amount: Amount) {
        self.total_accrued = self.total_accrued.saturating_add(amount);
        self.principal_supply = self.principal_supply.saturating_add(amount);
    }

    pub fn net_supply(&self) -> Amount {
        self.total_minted
            .saturating_add(self.total_accrued)
            .saturating_sub(self.total_burned)
    }
}

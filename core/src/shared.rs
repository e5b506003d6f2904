//! Thread-safe ledger handle.
//!
//! One write lock spans each operation's entire accrue-then-mutate sequence,
//! giving the strictly serialized execution model the core assumes: two
//! concurrent operations touching the same account can never interleave
//! their accrual and mutation steps.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::account::{Amount, Rate};
use crate::clock::Clock;
use crate::error::Result;
use crate::state::LedgerState;
use crate::supply::SupplyStats;

#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<LedgerState>>,
    clock: Arc<dyn Clock>,
}

impl SharedLedger {
    pub fn new(state: LedgerState, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
            clock,
        }
    }

    pub fn mint(&self, caller: &str, to: &str, amount: Amount, at_rate: Rate) -> Result<()> {
        let now = self.clock.now();
        self.inner.write().mint(caller, to, amount, at_rate, now)
    }

    pub fn burn(&self, caller: &str, from: &str, amount: Amount) -> Result<()> {
        let now = self.clock.now();
        self.inner.write().burn(caller, from, amount, now)
    }

    pub fn transfer(&self, caller: &str, to: &str, amount: Amount) -> Result<bool> {
        let now = self.clock.now();
        self.inner.write().transfer(caller, to, amount, now)
    }

    pub fn transfer_from(&self, caller: &str, from: &str, to: &str, amount: Amount) -> Result<bool> {
        let now = self.clock.now();
        self.inner.write().transfer_from(caller, from, to, amount, now)
    }

    pub fn accrue(&self, account: &str) -> Result<Amount> {
        let now = self.clock.now();
        self.inner.write().accrue(account, now)
    }

    pub fn set_global_rate(&self, caller: &str, new_rate: Rate) -> Result<()> {
        self.inner.write().set_global_rate(caller, new_rate)
    }

    pub fn grant_minter(&self, caller: &str, who: &str) -> Result<()> {
        self.inner.write().grant_minter(caller, who)
    }

    pub fn revoke_minter(&self, caller: &str, who: &str) -> Result<()> {
        self.inner.write().revoke_minter(caller, who)
    }

    pub fn approve(&self, caller: &str, spender: &str, amount: Amount) {
        self.inner.write().approve(caller, spender, amount)
    }

    pub fn displayed_balance(&self, account: &str) -> Amount {
        let now = self.clock.now();
        self.inner.read().displayed_balance(account, now)
    }

    pub fn raw_principal(&self, account: &str) -> Amount {
        self.inner.read().raw_principal(account)
    }

    pub fn user_rate(&self, account: &str) -> Rate {
        self.inner.read().user_rate(account)
    }

    pub fn global_rate(&self) -> Rate {
        self.inner.read().global_rate()
    }

    pub fn allowance(&self, holder: &str, spender: &str) -> Amount {
        self.inner.read().allowance(holder, spender)
    }

    pub fn supply(&self) -> SupplyStats {
        self.inner.read().supply().clone()
    }

    /// Run a closure against the locked state, e.g. to snapshot it.
    pub fn read<R>(&self, f: impl FnOnce(&LedgerState) -> R) -> R {
        f(&self.inner.read())
    }
}

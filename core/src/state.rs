//! Ledger core: lazy interest accrual over per-account fixed rates.
//!
//! Every mutating operation reconciles owed interest into principal for each
//! account it touches before applying its own change. Accrued values are
//! staged and validated first, then written, so a failed call leaves no
//! partial mutation behind (not even the accrual).

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::account::{Account, Amount, Rate, Timestamp, MAX_AMOUNT};
use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;
use crate::policy::{AccessPolicy, PrincipalId};
use crate::rate::{balance_with_interest, projected_balance};
use crate::supply::SupplyStats;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerState {
    accounts: HashMap<PrincipalId, Account>,
    /// Rate assigned to future depositors; only ever decreases.
    global_rate: Rate,
    policy: AccessPolicy,
    supply: SupplyStats,
    events: Vec<LedgerEvent>,
}

impl LedgerState {
    pub fn new(owner: impl Into<PrincipalId>, initial_rate: Rate) -> Self {
        Self {
            accounts: HashMap::new(),
            global_rate: initial_rate,
            policy: AccessPolicy::new(owner),
            supply: SupplyStats::default(),
            events: Vec::new(),
        }
    }

    // ---- queries ----

    /// Principal plus interest owed since the last reconciliation. Pure
    /// projection; never errors and never mutates. Unknown accounts show 0.
    pub fn displayed_balance(&self, account: &str, now: Timestamp) -> Amount {
        match self.accounts.get(account) {
            None => 0,
            Some(acct) => projected_balance(
                acct.principal,
                acct.rate,
                now.saturating_sub(acct.last_accrual),
            ),
        }
    }

    /// Stored principal without unaccrued interest: what was actually
    /// deposited (or materialized), independent of time-based growth.
    pub fn raw_principal(&self, account: &str) -> Amount {
        self.accounts.get(account).map(|a| a.principal).unwrap_or(0)
    }

    /// Rate captured for the account's current balance epoch.
    pub fn user_rate(&self, account: &str) -> Rate {
        self.accounts.get(account).map(|a| a.rate).unwrap_or(0)
    }

    pub fn global_rate(&self) -> Rate {
        self.global_rate
    }

    pub fn owner(&self) -> &str {
        self.policy.owner()
    }

    pub fn is_minter(&self, principal: &str) -> bool {
        self.policy.is_minter(principal)
    }

    pub fn allowance(&self, holder: &str, spender: &str) -> Amount {
        self.policy.allowance(holder, spender)
    }

    pub fn supply(&self) -> &SupplyStats {
        &self.supply
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // ---- accrual ----

    /// Compute an account's reconciled form without writing it: principal
    /// grown by owed interest, `last_accrual` advanced to `now`. Returns the
    /// staged record and the materialized interest delta. A clock reading at
    /// or before `last_accrual` yields zero elapsed time and no movement of
    /// `last_accrual`, so the reconciliation point never goes backwards.
    fn staged_accrual(&self, account: &str, now: Timestamp) -> Result<(Account, Amount)> {
        let mut acct = self.accounts.get(account).cloned().unwrap_or_default();
        let elapsed = now.saturating_sub(acct.last_accrual);
        let grown = balance_with_interest(acct.principal, acct.rate, elapsed)?;
        let delta = grown - acct.principal;
        acct.principal = grown;
        if now > acct.last_accrual {
            acct.last_accrual = now;
        }
        Ok((acct, delta))
    }

    fn commit_account(&mut self, account: &str, staged: Account, accrued: Amount) {
        if accrued > 0 {
            self.supply.record_accrual(accrued);
            debug!("accrued {} units into {}", accrued, account);
        }
        self.accounts.insert(account.to_string(), staged);
    }

    /// Reconcile owed interest into principal for one account and persist
    /// the result. Idempotent at zero elapsed time. Returns the materialized
    /// interest.
    pub fn accrue(&mut self, account: &str, now: Timestamp) -> Result<Amount> {
        let (staged, delta) = self.staged_accrual(account, now)?;
        self.commit_account(account, staged, delta);
        Ok(delta)
    }

    // ---- rate administration ----

    /// Owner only. The global rate is strictly monotone decreasing; it
    /// applies to future depositors only and never touches rates already
    /// captured on accounts.
    pub fn set_global_rate(&mut self, caller: &str, new_rate: Rate) -> Result<()> {
        self.policy.require_owner(caller)?;
        if new_rate >= self.global_rate {
            return Err(LedgerError::RateIncreaseRejected {
                current: self.global_rate,
                proposed: new_rate,
            });
        }
        let old = self.global_rate;
        self.global_rate = new_rate;
        info!("global rate lowered: {} -> {}", old, new_rate);
        self.events
            .push(LedgerEvent::GlobalRateChanged { old, new: new_rate });
        Ok(())
    }

    pub fn grant_minter(&mut self, caller: &str, who: &str) -> Result<()> {
        self.policy.grant_minter(caller, who)?;
        info!("minter granted: {}", who);
        self.events.push(LedgerEvent::MinterGranted {
            who: who.to_string(),
        });
        Ok(())
    }

    pub fn revoke_minter(&mut self, caller: &str, who: &str) -> Result<()> {
        self.policy.revoke_minter(caller, who)?;
        info!("minter revoked: {}", who);
        self.events.push(LedgerEvent::MinterRevoked {
            who: who.to_string(),
        });
        Ok(())
    }

    pub fn approve(&mut self, caller: &str, spender: &str, amount: Amount) {
        self.policy.approve(caller, spender, amount);
        self.events.push(LedgerEvent::Approved {
            holder: caller.to_string(),
            spender: spender.to_string(),
            amount,
        });
    }

    // ---- mutations ----

    /// Minter only. Accrues, then assigns `at_rate` to the recipient
    /// *unconditionally*: depositors get the rate the vault passes in
    /// (normally the current global rate).
    ///
    /// Risk: a minter that passes a rate different from the current global
    /// rate to an already-funded holder silently changes that holder's
    /// effective accrual rate for the rest of the epoch. Kept deliberately
    /// distinct from the transfer path, which only assigns a rate to an
    /// empty recipient.
    pub fn mint(
        &mut self,
        caller: &str,
        to: &str,
        amount: Amount,
        at_rate: Rate,
        now: Timestamp,
    ) -> Result<()> {
        self.policy.require_minter(caller)?;
        let (mut acct, delta) = self.staged_accrual(to, now)?;
        acct.rate = at_rate;
        acct.principal = acct
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.commit_account(to, acct, delta);
        self.supply.record_mint(amount);
        debug!("minted {} units to {} at rate {}", amount, to, at_rate);
        self.events.push(LedgerEvent::Minted {
            to: to.to_string(),
            amount,
            rate: at_rate,
        });
        Ok(())
    }

    /// Minter only. `MAX_AMOUNT` burns the full balance: the account is
    /// reconciled exactly once and the sentinel resolves against the
    /// already-reconciled principal, so the call never accrues twice.
    pub fn burn(&mut self, caller: &str, from: &str, amount: Amount, now: Timestamp) -> Result<()> {
        self.policy.require_minter(caller)?;
        let (mut acct, delta) = self.staged_accrual(from, now)?;
        let burned = if amount == MAX_AMOUNT {
            acct.principal
        } else {
            amount
        };
        if burned > acct.principal {
            return Err(LedgerError::InsufficientBalance {
                requested: burned,
                available: acct.principal,
            });
        }
        acct.principal -= burned;
        self.commit_account(from, acct, delta);
        self.supply.record_burn(burned);
        debug!("burned {} units from {}", burned, from);
        self.events.push(LedgerEvent::Burned {
            from: from.to_string(),
            amount: burned,
        });
        Ok(())
    }

    /// Accrue sender and recipient, resolve the sentinel against the
    /// sender's post-accrual balance, then move principal. Returns the
    /// amount actually moved.
    fn transfer_impl(
        &mut self,
        from: &str,
        to: &str,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        let (mut sender, sender_delta) = self.staged_accrual(from, now)?;
        let moved = if amount == MAX_AMOUNT {
            sender.principal
        } else {
            amount
        };
        if moved > sender.principal {
            return Err(LedgerError::InsufficientBalance {
                requested: moved,
                available: sender.principal,
            });
        }

        if from == to {
            // Self-transfer moves nothing but still reconciles the account.
            self.commit_account(from, sender, sender_delta);
            return Ok(moved);
        }

        let (mut recipient, recipient_delta) = self.staged_accrual(to, now)?;
        // Rate propagation: an empty recipient opens a new balance epoch at
        // the sender's rate, not the current global rate.
        if recipient.principal == 0 {
            recipient.rate = sender.rate;
        }
        sender.principal -= moved;
        recipient.principal = recipient
            .principal
            .checked_add(moved)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.commit_account(from, sender, sender_delta);
        self.commit_account(to, recipient, recipient_delta);
        Ok(moved)
    }

    pub fn transfer(
        &mut self,
        caller: &str,
        to: &str,
        amount: Amount,
        now: Timestamp,
    ) -> Result<bool> {
        let moved = self.transfer_impl(caller, to, amount, now)?;
        debug!("transferred {} units {} -> {}", moved, caller, to);
        self.events.push(LedgerEvent::Transferred {
            from: caller.to_string(),
            to: to.to_string(),
            amount: moved,
        });
        Ok(true)
    }

    /// Transfer on behalf of `from`, gated by the allowance table. The
    /// sentinel resolves before the allowance check, so approvals are
    /// checked and consumed for the amount actually moved.
    pub fn transfer_from(
        &mut self,
        caller: &str,
        from: &str,
        to: &str,
        amount: Amount,
        now: Timestamp,
    ) -> Result<bool> {
        let (sender, _) = self.staged_accrual(from, now)?;
        let moved = if amount == MAX_AMOUNT {
            sender.principal
        } else {
            amount
        };
        let approved = self.policy.allowance(from, caller);
        if approved < moved {
            return Err(LedgerError::InsufficientAllowance {
                spender: caller.to_string(),
                requested: moved,
                approved,
            });
        }

        let moved = self.transfer_impl(from, to, amount, now)?;
        self.policy.consume_allowance(from, caller, moved)?;
        debug!(
            "transferred {} units {} -> {} (spender {})",
            moved, from, to, caller
        );
        self.events.push(LedgerEvent::Transferred {
            from: from.to_string(),
            to: to.to_string(),
            amount: moved,
        });
        Ok(true)
    }
}

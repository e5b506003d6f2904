//! Account records and ledger scalar types

use serde::{Deserialize, Serialize};

/// Raw ledger units.
pub type Amount = u64;

/// Fixed-point per-second interest fraction, scaled by [`crate::rate::RATE_SCALE`].
pub type Rate = u128;

/// Seconds since the unix epoch (or a logical clock in tests).
pub type Timestamp = u64;

/// Sentinel amount: burn or transfer the full post-accrual balance.
pub const MAX_AMOUNT: Amount = Amount::MAX;

/// Per-holder ledger record. Springs into existence the first time an
/// operation references a principal identifier; never deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Raw minted units, not including unaccrued interest.
    pub principal: Amount,
    /// Interest rate captured when the current balance epoch opened.
    pub rate: Rate,
    /// Last reconciliation point; only ever advances.
    pub last_accrual: Timestamp,
}

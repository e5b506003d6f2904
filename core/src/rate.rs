//! Fixed-point interest arithmetic.
//!
//! Rates are per-second fractions scaled by [`RATE_SCALE`]. A balance held
//! for `elapsed` seconds grows by the multiplier
//! `(RATE_SCALE + rate * elapsed) / RATE_SCALE`: simple interest within a
//! single reconciliation gap. Principal absorbs the interest at each
//! reconciliation, so growth compounds slightly across gaps.

use crate::account::{Amount, Rate};
use crate::error::{LedgerError, Result};

/// Fixed-point precision factor (1e18).
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Seconds in a year (365 days).
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Basis points scale (100% = 10000 bps).
pub const BPS_SCALE: u128 = 10_000;

/// Balance after interest on the mutating path:
/// `principal * (RATE_SCALE + rate * elapsed) / RATE_SCALE`, checked.
/// Any intermediate overflow fails the whole operation.
pub fn balance_with_interest(principal: Amount, rate: Rate, elapsed: u64) -> Result<Amount> {
    if principal == 0 || rate == 0 || elapsed == 0 {
        return Ok(principal);
    }
    let multiplier = rate
        .checked_mul(elapsed as u128)
        .and_then(|r| r.checked_add(RATE_SCALE))
        .ok_or(LedgerError::ArithmeticOverflow)?;
    let grown = (principal as u128)
        .checked_mul(multiplier)
        .ok_or(LedgerError::ArithmeticOverflow)?
        / RATE_SCALE;
    Amount::try_from(grown).map_err(|_| LedgerError::ArithmeticOverflow)
}

/// Balance after interest on the read-only path: same formula, but
/// saturating at `Amount::MAX` so that a pure query never errors.
pub fn projected_balance(principal: Amount, rate: Rate, elapsed: u64) -> Amount {
    if principal == 0 || rate == 0 || elapsed == 0 {
        return principal;
    }
    let multiplier = rate
        .saturating_mul(elapsed as u128)
        .saturating_add(RATE_SCALE);
    let grown = (principal as u128).saturating_mul(multiplier) / RATE_SCALE;
    Amount::try_from(grown).unwrap_or(Amount::MAX)
}

/// Convert an annual rate in basis points to the per-second fixed-point form.
pub fn rate_from_bps(bps: u32) -> Rate {
    bps as u128 * RATE_SCALE / BPS_SCALE / SECONDS_PER_YEAR as u128
}

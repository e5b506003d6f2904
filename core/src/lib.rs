//! Accrue Core Library
//!
//! Value-accruing account ledger:
//! - Per-holder interest rates captured at deposit time
//! - Lazy accrual, reconciled at every mutation boundary
//! - Monotonically decreasing global rate for future depositors
//! - Owner/minter access policy with a transfer-from allowance table

pub mod account;
pub mod clock;
pub mod error;
pub mod event;
pub mod policy;
pub mod rate;
pub mod shared;
pub mod snapshot;
pub mod state;
pub mod supply;

// Re-export main types
pub use account::{Account, Amount, Rate, Timestamp, MAX_AMOUNT};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LedgerError, Result};
pub use event::LedgerEvent;
pub use policy::{AccessPolicy, PrincipalId};
pub use rate::{rate_from_bps, RATE_SCALE, SECONDS_PER_YEAR};
pub use shared::SharedLedger;
pub use state::LedgerState;
pub use supply::SupplyStats;

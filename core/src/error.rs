//! Ledger error types

use thiserror::Error;

use crate::account::{Amount, Rate};

/// Ledger core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller {caller} lacks {required} authorization")]
    Unauthorized {
        caller: String,
        required: &'static str,
    },

    #[error("global rate may only decrease: current {current}, proposed {proposed}")]
    RateIncreaseRejected { current: Rate, proposed: Rate },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("insufficient allowance for spender {spender}: requested {requested}, approved {approved}")]
    InsufficientAllowance {
        spender: String,
        requested: Amount,
        approved: Amount,
    },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

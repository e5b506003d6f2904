//! Append-only event journal emitted by ledger mutations.

use serde::{Deserialize, Serialize};

use crate::account::{Amount, Rate};
use crate::policy::PrincipalId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Minted {
        to: PrincipalId,
        amount: Amount,
        rate: Rate,
    },
    Burned {
        from: PrincipalId,
        amount: Amount,
    },
    Transferred {
        from: PrincipalId,
        to: PrincipalId,
        amount: Amount,
    },
    GlobalRateChanged {
        old: Rate,
        new: Rate,
    },
    MinterGranted {
        who: PrincipalId,
    },
    MinterRevoked {
        who: PrincipalId,
    },
    Approved {
        holder: PrincipalId,
        spender: PrincipalId,
        amount: Amount,
    },
}

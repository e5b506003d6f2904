//! JSON snapshot persistence for the ledger state.
//!
//! The durable state is exactly the per-account (principal, rate,
//! last_accrual) triples, the global rate, the access policy, the supply
//! counters, and the event journal; all of it round-trips losslessly
//! through serde.

use std::fs;
use std::path::Path;

use crate::error::{LedgerError, Result};
use crate::state::LedgerState;

/// Write the state as pretty JSON. Goes through a sibling temp file and a
/// rename so a crash mid-write cannot truncate an existing snapshot.
pub fn save_to_path(state: &LedgerState, path: &Path) -> Result<()> {
    let json =
        serde_json::to_vec_pretty(state).map_err(|e| LedgerError::Serialization(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).map_err(|e| LedgerError::Storage(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| LedgerError::Storage(e.to_string()))?;
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<LedgerState> {
    let bytes = fs::read(path).map_err(|e| LedgerError::Storage(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::rate_from_bps;

    #[test]
    fn snapshot_round_trips_exactly() {
        let mut state = LedgerState::new("owner", rate_from_bps(500));
        state.grant_minter("owner", "vault").unwrap();
        state
            .mint("vault", "alice", 1_000_000, state.global_rate(), 1_000)
            .unwrap();
        state.approve("alice", "spender", 250);
        state.set_global_rate("owner", rate_from_bps(400)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        save_to_path(&state, &path).unwrap();
        let restored = load_from_path(&path).unwrap();

        assert_eq!(restored, state);
        assert_eq!(restored.raw_principal("alice"), 1_000_000);
        assert_eq!(restored.user_rate("alice"), rate_from_bps(500));
        assert_eq!(restored.global_rate(), rate_from_bps(400));
        assert_eq!(restored.allowance("alice", "spender"), 250);
        assert_eq!(restored.events().len(), state.events().len());
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}

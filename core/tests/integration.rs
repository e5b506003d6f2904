use accrue_core::*;

const UNIT: u64 = 100_000_000;

fn ledger() -> LedgerState {
    let mut state = LedgerState::new("owner", rate_from_bps(500));
    state.grant_minter("owner", "vault").unwrap();
    state
}

#[test]
fn test_linear_accrual() {
    // Sole depositor, 5% APR, two equal intervals with no reconciliation in
    // between: interest per interval differs by at most 1 unit of rounding.
    let mut state = ledger();
    let rate = state.global_rate();
    let principal = 10 * UNIT;
    state.mint("vault", "alice", principal, rate, 0).unwrap();

    let dt = 100_000;
    let b1 = state.displayed_balance("alice", dt);
    let b2 = state.displayed_balance("alice", 2 * dt);
    let first = b1 - principal;
    let second = b2 - b1;
    assert!(first > 0);
    assert!(second.abs_diff(first) <= 1, "first {first}, second {second}");
}

#[test]
fn test_accrual_compounds_across_reconciliations() {
    // Reconciling between the intervals folds interval-one interest into
    // principal, so interval two earns slightly more. The growth stays
    // within a small epsilon, not exact equality.
    let mut state = ledger();
    let rate = state.global_rate();
    let principal = 10 * UNIT;
    state.mint("vault", "alice", principal, rate, 0).unwrap();

    let dt = 100_000;
    let first = state.accrue("alice", dt).unwrap();
    let second = state.accrue("alice", 2 * dt).unwrap();
    assert!(second >= first);
    assert!(second - first <= first / 1000 + 1, "first {first}, second {second}");
}

#[test]
fn test_immediate_redemption_round_trip() {
    // Deposit A, immediately burn the max sentinel: balance goes to exactly
    // zero and the redeemed amount equals A.
    let mut state = ledger();
    let rate = state.global_rate();
    let deposit = 123_456_789;
    state.mint("vault", "alice", deposit, rate, 50).unwrap();

    state.burn("vault", "alice", MAX_AMOUNT, 50).unwrap();
    assert_eq!(state.displayed_balance("alice", 50), 0);
    assert_eq!(state.raw_principal("alice"), 0);
    assert_eq!(state.supply().total_burned, deposit);
}

#[test]
fn test_full_reconciliation_conservation() {
    // Deposit A, let time pass, read B > A, redeem max: the redeemed amount
    // equals B exactly (the read projection and the mutating accrual agree).
    let mut state = ledger();
    let rate = state.global_rate();
    let deposit = 10 * UNIT;
    state.mint("vault", "alice", deposit, rate, 0).unwrap();

    let later = SECONDS_PER_YEAR / 2;
    let displayed = state.displayed_balance("alice", later);
    assert!(displayed > deposit);

    state.burn("vault", "alice", MAX_AMOUNT, later).unwrap();
    assert_eq!(state.supply().total_burned, displayed);
    assert_eq!(state.displayed_balance("alice", later), 0);
}

#[test]
fn test_rate_immutable_under_global_change() {
    let mut state = ledger();
    let r1 = state.global_rate();
    state.mint("vault", "alice", 5 * UNIT, r1, 0).unwrap();
    state.mint("vault", "bob", 5 * UNIT, r1, 0).unwrap();

    let r2 = rate_from_bps(300);
    state.set_global_rate("owner", r2).unwrap();
    assert_eq!(state.global_rate(), r2);

    // Captured rates are untouched by the global change.
    assert_eq!(state.user_rate("alice"), r1);
    assert_eq!(state.user_rate("bob"), r1);

    // A transfer between funded holders preserves both rates.
    state.transfer("alice", "bob", UNIT, 1_000).unwrap();
    assert_eq!(state.user_rate("alice"), r1);
    assert_eq!(state.user_rate("bob"), r1);

    // An empty recipient inherits the sender's rate, not the global one.
    state.transfer("alice", "carol", UNIT, 1_000).unwrap();
    assert_eq!(state.user_rate("carol"), r1);
}

#[test]
fn test_global_rate_is_strictly_decreasing() {
    let mut state = ledger();
    let current = state.global_rate();

    let err = state.set_global_rate("owner", current).unwrap_err();
    assert_eq!(
        err,
        LedgerError::RateIncreaseRejected {
            current,
            proposed: current,
        }
    );
    let higher = rate_from_bps(600);
    assert!(state.set_global_rate("owner", higher).is_err());
    assert_eq!(state.global_rate(), current);

    state.set_global_rate("owner", rate_from_bps(499)).unwrap();
    assert_eq!(state.global_rate(), rate_from_bps(499));
}

#[test]
fn test_authorization_gating() {
    let mut state = ledger();
    let rate = state.global_rate();

    let err = state.mint("mallory", "mallory", UNIT, rate, 0).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));

    state.mint("vault", "alice", UNIT, rate, 0).unwrap();
    let err = state.burn("mallory", "alice", UNIT, 0).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));

    let err = state
        .set_global_rate("mallory", rate_from_bps(100))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
    assert_eq!(state.global_rate(), rate);

    let err = state.grant_minter("mallory", "mallory").unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
}

#[test]
fn test_principal_vs_displayed_divergence() {
    let mut state = ledger();
    let rate = state.global_rate();
    let deposit = 10 * UNIT;
    state.mint("vault", "alice", deposit, rate, 0).unwrap();

    // Immediately after deposit the two views agree.
    assert_eq!(state.raw_principal("alice"), deposit);
    assert_eq!(state.displayed_balance("alice", 0), deposit);

    // Time passes: principal stays fixed, displayed strictly grows.
    let later = 30 * 86_400;
    assert_eq!(state.raw_principal("alice"), deposit);
    let displayed = state.displayed_balance("alice", later);
    assert!(displayed > deposit);

    // The next mutating call reconciles and the views converge.
    state.accrue("alice", later).unwrap();
    assert_eq!(state.raw_principal("alice"), displayed);
    assert_eq!(state.displayed_balance("alice", later), displayed);
}

#[test]
fn test_failed_calls_leave_no_partial_state() {
    let mut state = ledger();
    let rate = state.global_rate();
    let deposit = 10 * UNIT;
    state.mint("vault", "alice", deposit, rate, 0).unwrap();

    let later = 30 * 86_400;
    let before = state.clone();

    // Over-burn fails after the staged accrual; nothing is written, not
    // even the accrual.
    let displayed = state.displayed_balance("alice", later);
    let err = state
        .burn("vault", "alice", displayed + 1, later)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(state, before);

    // Same for an over-transfer.
    let err = state
        .transfer("alice", "bob", displayed + 1, later)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(state, before);
}

#[test]
fn test_transfer_max_sentinel_moves_full_balance() {
    let mut state = ledger();
    let rate = state.global_rate();
    state.mint("vault", "alice", 10 * UNIT, rate, 0).unwrap();

    let later = 90 * 86_400;
    let displayed = state.displayed_balance("alice", later);
    state.transfer("alice", "bob", MAX_AMOUNT, later).unwrap();
    assert_eq!(state.raw_principal("alice"), 0);
    assert_eq!(state.raw_principal("bob"), displayed);
}

#[test]
fn test_transfer_from_consumes_allowance() {
    let mut state = ledger();
    let rate = state.global_rate();
    state.mint("vault", "alice", 10 * UNIT, rate, 0).unwrap();

    state.approve("alice", "spender", 3 * UNIT);
    state
        .transfer_from("spender", "alice", "bob", 2 * UNIT, 0)
        .unwrap();
    assert_eq!(state.raw_principal("bob"), 2 * UNIT);
    assert_eq!(state.allowance("alice", "spender"), UNIT);

    let err = state
        .transfer_from("spender", "alice", "bob", 2 * UNIT, 0)
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientAllowance {
            spender: "spender".to_string(),
            requested: 2 * UNIT,
            approved: UNIT,
        }
    );
    assert_eq!(state.raw_principal("bob"), 2 * UNIT);
}

#[test]
fn test_transfer_from_sentinel_resolves_before_allowance_check() {
    let mut state = ledger();
    let rate = state.global_rate();
    state.mint("vault", "alice", 10 * UNIT, rate, 0).unwrap();

    // An approval covering the whole balance lets the sentinel through and
    // is consumed for the resolved amount.
    state.approve("alice", "spender", 10 * UNIT);
    state
        .transfer_from("spender", "alice", "bob", MAX_AMOUNT, 0)
        .unwrap();
    assert_eq!(state.raw_principal("alice"), 0);
    assert_eq!(state.raw_principal("bob"), 10 * UNIT);
    assert_eq!(state.allowance("alice", "spender"), 0);
}

#[test]
fn test_mint_rate_overwrite_on_funded_account() {
    // The documented risk path: re-minting at a different explicit rate
    // silently changes a funded holder's effective rate.
    let mut state = ledger();
    let r1 = state.global_rate();
    state.mint("vault", "alice", 5 * UNIT, r1, 0).unwrap();
    assert_eq!(state.user_rate("alice"), r1);

    let r2 = rate_from_bps(100);
    state.mint("vault", "alice", UNIT, r2, 0).unwrap();
    assert_eq!(state.user_rate("alice"), r2);
}

#[test]
fn test_supply_counters_match_account_principals() {
    let mut state = ledger();
    let rate = state.global_rate();
    state.mint("vault", "alice", 10 * UNIT, rate, 0).unwrap();
    state.mint("vault", "bob", 5 * UNIT, rate, 0).unwrap();

    let later = 45 * 86_400;
    state.accrue("alice", later).unwrap();
    state.transfer("bob", "carol", 2 * UNIT, later).unwrap();
    state.burn("vault", "alice", UNIT, later).unwrap();

    let sum = state.raw_principal("alice")
        + state.raw_principal("bob")
        + state.raw_principal("carol");
    assert_eq!(state.supply().principal_supply, sum);
    assert_eq!(state.supply().net_supply(), sum);
}

#[test]
fn test_event_journal_records_mutations() {
    let mut state = ledger();
    let rate = state.global_rate();
    state.mint("vault", "alice", UNIT, rate, 0).unwrap();
    state.transfer("alice", "bob", UNIT / 2, 0).unwrap();
    state.burn("vault", "bob", MAX_AMOUNT, 0).unwrap();

    let events = state.events();
    assert!(matches!(events[0], LedgerEvent::MinterGranted { .. }));
    assert!(matches!(events[1], LedgerEvent::Minted { amount, .. } if amount == UNIT));
    assert!(
        matches!(&events[2], LedgerEvent::Transferred { from, amount, .. }
            if from == "alice" && *amount == UNIT / 2)
    );
    // The burn event carries the resolved amount, not the sentinel.
    assert!(matches!(events[3], LedgerEvent::Burned { amount, .. } if amount == UNIT / 2));
}

#[test]
fn test_unknown_accounts_display_zero() {
    let state = ledger();
    assert_eq!(state.displayed_balance("nobody", 1_000_000), 0);
    assert_eq!(state.raw_principal("nobody"), 0);
    assert_eq!(state.user_rate("nobody"), 0);
}

//! Accrue CLI - operator tool for the accruing credit ledger
//!
//! Each invocation loads the JSON snapshot, applies one operation through
//! the core's public API, and writes the snapshot back. This tool is a
//! caller of the ledger core, standing in for the vault and admin
//! collaborators.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use accrue_core::{
    rate_from_bps, snapshot, Amount, Clock, LedgerState, Rate, SystemClock, MAX_AMOUNT,
    RATE_SCALE, SECONDS_PER_YEAR,
};

#[derive(Parser)]
#[command(name = "accrue")]
#[command(about = "Accruing credit ledger operator tool", version)]
struct Cli {
    /// Path to the ledger state file
    #[arg(long, default_value = "ledger.json")]
    state: PathBuf,

    /// Acting principal for gated operations
    #[arg(long, default_value = "operator")]
    caller: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new ledger state file
    Init {
        /// Owner principal
        #[arg(long)]
        owner: String,

        /// Initial global rate, basis points per year
        #[arg(long)]
        rate_bps: u32,
    },

    /// Mint units to an account (caller must be a minter)
    Mint {
        to: String,
        amount: u64,

        /// Rate to assign, basis points per year (defaults to the global rate)
        #[arg(long)]
        rate_bps: Option<u32>,
    },

    /// Burn units from an account; "all" burns the full balance
    Burn {
        from: String,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Move units from the caller to another account; "all" moves everything
    Transfer {
        to: String,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Move units on behalf of another holder, consuming an allowance
    TransferFrom {
        from: String,
        to: String,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Approve a spender to transfer from the caller's account
    Approve { spender: String, amount: u64 },

    /// Materialize owed interest into an account's principal
    Accrue { account: String },

    /// Lower the global rate (owner only)
    SetRate {
        /// New global rate, basis points per year
        rate_bps: u32,
    },

    /// Grant minter authorization (owner only)
    GrantMinter { who: String },

    /// Revoke minter authorization (owner only)
    RevokeMinter { who: String },

    /// Show displayed balance (principal plus owed interest)
    Balance { account: String },

    /// Show raw principal without unaccrued interest
    Principal { account: String },

    /// Show an account's captured rate
    Rate { account: String },

    /// Show the current global rate
    GlobalRate,

    /// Show supply counters
    Supply,

    /// Show the event journal
    Events,
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    if s == "all" {
        return Ok(MAX_AMOUNT);
    }
    s.parse::<Amount>().map_err(|e| e.to_string())
}

fn format_rate(rate: Rate) -> String {
    // Round to the nearest bps: the per-second form truncates, so a plain
    // division would display 500 bps as 4.99%.
    let bps = (rate * SECONDS_PER_YEAR as u128 * 10_000 + RATE_SCALE / 2) / RATE_SCALE;
    format!("{} ({}.{:02}% APR)", rate, bps / 100, bps % 100)
}

fn format_time(secs: u64) -> String {
    Local
        .timestamp_opt(secs as i64, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let now = SystemClock.now();

    if let Commands::Init { owner, rate_bps } = &cli.command {
        let rate = rate_from_bps(*rate_bps);
        let state = LedgerState::new(owner.clone(), rate);
        snapshot::save_to_path(&state, &cli.state)?;
        println!(
            "{} ledger initialized at {} (owner {}, rate {})",
            "✓".green(),
            cli.state.display(),
            owner,
            format_rate(rate)
        );
        return Ok(());
    }

    let mut state = snapshot::load_from_path(&cli.state)?;
    let caller = cli.caller.as_str();
    let mut dirty = true;

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),

        Commands::Mint {
            to,
            amount,
            rate_bps,
        } => {
            let rate = rate_bps
                .map(rate_from_bps)
                .unwrap_or_else(|| state.global_rate());
            state.mint(caller, &to, amount, rate, now)?;
            println!(
                "{} minted {} to {} at rate {}",
                "✓".green(),
                amount,
                to,
                format_rate(rate)
            );
        }
        Commands::Burn { from, amount } => {
            state.burn(caller, &from, amount, now)?;
            println!("{} burned from {}", "✓".green(), from);
        }
        Commands::Transfer { to, amount } => {
            state.transfer(caller, &to, amount, now)?;
            println!("{} transferred {} -> {}", "✓".green(), caller, to);
        }
        Commands::TransferFrom { from, to, amount } => {
            state.transfer_from(caller, &from, &to, amount, now)?;
            println!(
                "{} transferred {} -> {} (spender {})",
                "✓".green(),
                from,
                to,
                caller
            );
        }
        Commands::Approve { spender, amount } => {
            state.approve(caller, &spender, amount);
            println!("{} approved {} for {}", "✓".green(), amount, spender);
        }
        Commands::Accrue { account } => {
            let delta = state.accrue(&account, now)?;
            println!("{} accrued {} units into {}", "✓".green(), delta, account);
        }
        Commands::SetRate { rate_bps } => {
            let rate = rate_from_bps(rate_bps);
            state.set_global_rate(caller, rate)?;
            println!("{} global rate set to {}", "✓".green(), format_rate(rate));
        }
        Commands::GrantMinter { who } => {
            state.grant_minter(caller, &who)?;
            println!("{} minter granted: {}", "✓".green(), who);
        }
        Commands::RevokeMinter { who } => {
            state.revoke_minter(caller, &who)?;
            println!("{} minter revoked: {}", "✓".green(), who);
        }

        Commands::Balance { account } => {
            dirty = false;
            println!(
                "{} (as of {})",
                state.displayed_balance(&account, now),
                format_time(now)
            );
        }
        Commands::Principal { account } => {
            dirty = false;
            println!("{}", state.raw_principal(&account));
        }
        Commands::Rate { account } => {
            dirty = false;
            println!("{}", format_rate(state.user_rate(&account)));
        }
        Commands::GlobalRate => {
            dirty = false;
            println!("{}", format_rate(state.global_rate()));
        }
        Commands::Supply => {
            dirty = false;
            let supply = state.supply();
            println!("minted:    {}", supply.total_minted);
            println!("accrued:   {}", supply.total_accrued);
            println!("burned:    {}", supply.total_burned);
            println!("principal: {}", supply.principal_supply);
        }
        Commands::Events => {
            dirty = false;
            for event in state.events() {
                println!("{}", serde_json::to_string(event)?);
            }
        }
    }

    if dirty {
        snapshot::save_to_path(&state, &cli.state)?;
    }
    Ok(())
}

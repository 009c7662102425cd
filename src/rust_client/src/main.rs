use std::{thread::sleep, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::{Config, ConfigArgs};
use report::{log_record, owner_is_expected, unlock_wait, LockRecordView};
use solana_client::rpc_client::RpcClient;
use solana_sdk::signer::Signer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use transaction::{
    check_balance, create_lock_account, fetch_lock_record, lock, request_air_drop, unlock,
};

mod config;
mod error;
mod report;
mod transaction;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lock SOL in a program-owned account and release it", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create and fund the lock account, lock, read it back and unlock (default)
    Run {
        /// Unlock right away instead of waiting for the unlock time
        #[arg(long)]
        no_wait: bool,
    },
    /// Create and fund the lock account if needed, then lock
    Lock,
    /// Read and decode the lock account
    Show {
        /// Print the record as JSON instead of logging it
        #[arg(long)]
        json: bool,
    },
    /// Release the locked lamports
    Unlock,
    /// Print the locker and lock account balances
    Balance,
    /// Request an airdrop to the locker
    Airdrop {
        /// Amount of SOL to request
        sol: f64,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_args(cli.config).context("invalid configuration")?;
    let rpc_client = RpcClient::new_with_commitment(config.rpc_url.clone(), config.commitment);

    info!(url = %config.rpc_url, locker = %config.locker.pubkey(), lock_account = %config.lock_account, "connected");

    match cli.cmd.unwrap_or(Cmd::Run { no_wait: false }) {
        Cmd::Run { no_wait } => run(&rpc_client, &config, !no_wait),
        Cmd::Lock => create_and_lock(&rpc_client, &config),
        Cmd::Show { json } => show(&rpc_client, &config, json),
        Cmd::Unlock => {
            unlock(&rpc_client, &config.program_id, &config.locker, &config.lock_account)
                .context("unlock failed")?;
            print_balances(&rpc_client, &config)
        }
        Cmd::Balance => print_balances(&rpc_client, &config),
        Cmd::Airdrop { sol } => {
            let sig = request_air_drop(&rpc_client, &config.locker.pubkey(), sol)
                .context("airdrop failed")?;
            info!(signature = %sig, sol, "airdrop confirmed");
            print_balances(&rpc_client, &config)
        }
    }
}

fn run(rpc_client: &RpcClient, config: &Config, wait: bool) -> Result<()> {
    print_balances(rpc_client, config)?;
    create_and_lock(rpc_client, config)?;

    let record = fetch_lock_record(rpc_client, &config.lock_account)
        .context("failed to read lock account")?
        .ok_or_else(|| anyhow!("lock account {} not found after locking", config.lock_account))?;
    log_record(&config.lock_account, &record);

    let locker_key = config.locker.pubkey();
    if owner_is_expected(&record, &locker_key, &config.lock_account) {
        debug!(owner = %record.owner(), "lock owner matches");
    } else {
        warn!(owner = %record.owner(), locker = %locker_key, "lock account owner is neither the locker nor the lock account");
    }

    if wait {
        match record.unlock_timestamp() {
            Some(unlock_at) => {
                let wait = unlock_wait(unlock_at, Utc::now().timestamp(), config.max_wait)
                    .context("refusing to wait for unlock time")?;
                if let Some(secs) = wait {
                    info!("Waiting for unlock time in {} seconds...", secs);
                    sleep(Duration::from_secs(secs + 1));
                }
            }
            None => info!("unlock time is not a timestamp, unlocking right away"),
        }
    }

    unlock(rpc_client, &config.program_id, &config.locker, &config.lock_account)
        .context("unlock failed")?;
    info!("Unlocked successfully!");

    print_balances(rpc_client, config)
}

fn create_and_lock(rpc_client: &RpcClient, config: &Config) -> Result<()> {
    create_lock_account(
        rpc_client,
        &config.program_id,
        &config.locker,
        &config.seed,
        &config.lock_account,
        config.amount,
    )
    .context("failed to create lock account")?;

    lock(
        rpc_client,
        &config.program_id,
        &config.locker,
        &config.lock_account,
        config.amount,
    )
    .context("lock failed")?;

    info!(lock_account = %config.lock_account, "locked successfully");
    Ok(())
}

fn show(rpc_client: &RpcClient, config: &Config, json: bool) -> Result<()> {
    let record = match fetch_lock_record(rpc_client, &config.lock_account)
        .context("failed to read lock account")?
    {
        Some(record) => record,
        None => {
            warn!(lock_account = %config.lock_account, "lock account does not exist");
            return Ok(());
        }
    };

    if json {
        let view = LockRecordView::new(&config.lock_account, &record);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        log_record(&config.lock_account, &record);
    }

    Ok(())
}

fn print_balances(rpc_client: &RpcClient, config: &Config) -> Result<()> {
    let balance = check_balance(rpc_client, &config.locker.pubkey())?;
    info!("Locker balance: {:?}", balance);

    let lock_balance = check_balance(rpc_client, &config.lock_account)?;
    info!("Lock account balance: {:?}", lock_balance);

    Ok(())
}

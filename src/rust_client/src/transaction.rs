use std::{thread::sleep, time::Duration};

use lock_interface::{
    instruction,
    state::{LockRecord, LOCK_ACCOUNT_LEN},
};
use solana_client::rpc_client::RpcClient;
use solana_program::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::error::ClientError;

pub fn check_balance(rpc_client: &RpcClient, public_key: &Pubkey) -> Result<f64, ClientError> {
    Ok(rpc_client.get_balance(public_key)? as f64 / LAMPORTS_PER_SOL as f64)
}

/// Converts a SOL amount to lamports. The result must be at least one lamport
/// and fit in a `u64`.
pub fn sol_to_lamports(sol: f64) -> Result<u64, ClientError> {
    let lamports = sol * LAMPORTS_PER_SOL as f64;
    if !lamports.is_finite() || lamports < 1.0 || lamports > u64::MAX as f64 {
        return Err(ClientError::InvalidSolAmount(sol));
    }
    Ok(lamports as u64)
}

pub fn request_air_drop(
    rpc_client: &RpcClient,
    pub_key: &Pubkey,
    amount_sol: f64,
) -> Result<Signature, ClientError> {
    let lamports = sol_to_lamports(amount_sol)?;
    let sig = rpc_client.request_airdrop(pub_key, lamports)?;
    loop {
        let confirmed = rpc_client.confirm_transaction(&sig)?;
        if confirmed {
            break;
        }
        sleep(Duration::from_millis(500));
    }
    Ok(sig)
}

fn send(
    rpc_client: &RpcClient,
    instructions: &[Instruction],
    payer: &Keypair,
) -> Result<Signature, ClientError> {
    let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));

    let blockhash = rpc_client.get_latest_blockhash()?;
    transaction.sign(&[payer], blockhash);

    let signature = rpc_client.send_and_confirm_transaction(&transaction)?;
    debug!(%signature, "transaction confirmed");

    Ok(signature)
}

/// Creates the seed-derived lock account and funds it with `lamports` on top of
/// the rent-exempt minimum. Returns `None` if the account already exists.
pub fn create_lock_account(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    locker: &Keypair,
    seed: &str,
    lock_account: &Pubkey,
    lamports: u64,
) -> Result<Option<Signature>, ClientError> {
    let existing = rpc_client
        .get_account_with_commitment(lock_account, rpc_client.commitment())?
        .value;
    if existing.is_some() {
        info!(%lock_account, "lock account already exists, skipping creation");
        return Ok(None);
    }

    let rent = rpc_client.get_minimum_balance_for_rent_exemption(LOCK_ACCOUNT_LEN)?;
    let locker_key = locker.pubkey();

    info!(%lock_account, rent, lamports, "creating lock account");
    let signature = send(
        rpc_client,
        &[system_instruction::create_account_with_seed(
            &locker_key,
            lock_account,
            &locker_key,
            seed,
            rent.saturating_add(lamports),
            LOCK_ACCOUNT_LEN as u64,
            program_id,
        )],
        locker,
    )?;

    Ok(Some(signature))
}

pub fn lock(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    locker: &Keypair,
    lock_account: &Pubkey,
    amount: u64,
) -> Result<Signature, ClientError> {
    info!(%lock_account, amount, "locking");
    send(
        rpc_client,
        &[instruction::lock(
            program_id,
            &locker.pubkey(),
            lock_account,
            amount,
        )],
        locker,
    )
}

pub fn unlock(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    locker: &Keypair,
    lock_account: &Pubkey,
) -> Result<Signature, ClientError> {
    info!(%lock_account, "unlocking");
    send(
        rpc_client,
        &[instruction::release(program_id, &locker.pubkey(), lock_account)],
        locker,
    )
}

/// Fetches and decodes the lock account. `None` means the account doesn't exist.
pub fn fetch_lock_record(
    rpc_client: &RpcClient,
    lock_account: &Pubkey,
) -> Result<Option<LockRecord>, ClientError> {
    let account = match rpc_client
        .get_account_with_commitment(lock_account, rpc_client.commitment())?
        .value
    {
        Some(account) => account,
        None => return Ok(None),
    };

    debug!(%lock_account, owner = %account.owner, len = account.data.len(), "fetched lock account");

    LockRecord::unpack(&account.data)
        .map(Some)
        .map_err(|source| ClientError::decode(lock_account, &account.data, source))
}

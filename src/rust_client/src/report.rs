use chrono::prelude::*;
use lock_interface::state::LockRecord;
use serde::Serialize;
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use tracing::info;

use crate::error::ClientError;

/// Printable form of a decoded lock account
#[derive(Debug, Serialize)]
pub struct LockRecordView {
    pub address: String,
    pub initialized: bool,
    pub owner: String,
    pub owner_hex: String,
    pub amount: u64,
    pub unlock_time: String,
    pub unlock_timestamp: Option<UnixTimestamp>,
}

impl LockRecordView {
    pub fn new(address: &Pubkey, record: &LockRecord) -> Self {
        LockRecordView {
            address: address.to_string(),
            initialized: record.is_initialized(),
            owner: record.owner().to_string(),
            owner_hex: record.owner_hex(),
            amount: record.amount(),
            unlock_time: record.unlock_time_hex(),
            unlock_timestamp: record.unlock_timestamp(),
        }
    }
}

pub fn format_timestamp(timestamp: UnixTimestamp) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(time) => time.to_rfc3339(),
        None => format!("{} (out of range)", timestamp),
    }
}

pub fn log_record(address: &Pubkey, record: &LockRecord) {
    let unlock_at = record
        .unlock_timestamp()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());

    info!(
        %address,
        initialized = record.is_initialized(),
        owner = %record.owner(),
        amount = record.amount(),
        sol = record.amount() as f64 / LAMPORTS_PER_SOL as f64,
        unlock_time = %record.unlock_time_hex(),
        %unlock_at,
        "lock account"
    );
}

/// Seconds left until `unlock_at`, or `None` if it has passed
pub fn seconds_until(unlock_at: UnixTimestamp, now: UnixTimestamp) -> Option<u64> {
    let diff = unlock_at.saturating_sub(now);
    if diff > 0 {
        Some(diff.unsigned_abs())
    } else {
        None
    }
}

/// Seconds to wait for `unlock_at`, refusing waits longer than `max_wait`
pub fn unlock_wait(
    unlock_at: UnixTimestamp,
    now: UnixTimestamp,
    max_wait: u64,
) -> Result<Option<u64>, ClientError> {
    match seconds_until(unlock_at, now) {
        Some(wait) if wait > max_wait => Err(ClientError::UnlockTooFar {
            unlock_at,
            wait,
            max_wait,
        }),
        other => Ok(other),
    }
}

/// The program may record either the locker or the lock account itself as owner
pub fn owner_is_expected(record: &LockRecord, locker: &Pubkey, lock_account: &Pubkey) -> bool {
    record.owner() == locker || record.owner() == lock_account
}

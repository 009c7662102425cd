//! The definitions for lock program instructions

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::{Pubkey, PubkeyError},
};

/// A lock program instruction
#[derive(Debug, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub enum LockInstruction {
    /// Lock lamports in a lock account
    /// Requires that the lock account is owned by the program and not yet initialized.
    /// Requires that the locker holds at least `amount` lamports.
    ///
    /// # Account references
    ///   0. `[SIGNER]` Locker account
    ///   1. `[WRITE]` Lock account
    Lock {
        /// The number of lamports to lock
        amount: u64,
    },

    /// Release the lamports held by a lock account back to the locker
    /// Fails with `EarlyUnlock` before the unlock time.
    ///
    /// # Account references
    ///   0. `[SIGNER]` Locker account
    ///   1. `[WRITE]` Lock account
    Release,
}

fn accounts(locker: &Pubkey, lock_account: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*locker, true),
        AccountMeta::new(*lock_account, false),
    ]
}

/// Creates a `Lock` instruction
pub fn lock(program_id: &Pubkey, locker: &Pubkey, lock_account: &Pubkey, amount: u64) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &LockInstruction::Lock { amount },
        accounts(locker, lock_account),
    )
}

/// Creates a `Release` instruction
pub fn release(program_id: &Pubkey, locker: &Pubkey, lock_account: &Pubkey) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &LockInstruction::Release,
        accounts(locker, lock_account),
    )
}

/// Address of the lock account for `locker`, derived from `seed` and owned by `program_id`
pub fn lock_account_address(
    locker: &Pubkey,
    seed: &str,
    program_id: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
    Pubkey::create_with_seed(locker, seed, program_id)
}

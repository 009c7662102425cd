//! Lock account state
#![deny(missing_docs)]

use arrayref::{array_ref, array_refs};
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

use crate::{
    error::DecodeError,
    pack_utils::{unpack_flag, unpack_u64_be},
};

/// Decoded view of a lock account's data
///
/// Layout:
///   [0]       u8        initialized (0 or 1)
///   [1..33]   [u8; 32]  owner
///   [33..41]  u64 (BE)  amount
///   [41..]    raw       unlock time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockRecord {
    initialized: bool,
    owner: Pubkey,
    amount: u64,
    unlock_time: Vec<u8>,
}

/// Width of the initialized flag
pub const INITIALIZED_LEN: usize = 1;
/// Width of the owner key
pub const OWNER_LEN: usize = 32;
/// Width of the locked amount
pub const AMOUNT_LEN: usize = 8;
/// Width of the unlock timestamp the program writes into the tail
pub const UNLOCK_TIME_LEN: usize = 8;

/// Offset of the initialized flag
pub const INITIALIZED_OFFSET: usize = 0;
/// Offset of the owner key
pub const OWNER_OFFSET: usize = INITIALIZED_OFFSET + INITIALIZED_LEN;
/// Offset of the locked amount
pub const AMOUNT_OFFSET: usize = OWNER_OFFSET + OWNER_LEN;
/// Offset of the unlock time tail
pub const UNLOCK_TIME_OFFSET: usize = AMOUNT_OFFSET + AMOUNT_LEN;

/// The smallest buffer that decodes into a [`LockRecord`]
pub const LOCK_RECORD_MIN_LEN: usize = INITIALIZED_LEN + OWNER_LEN + AMOUNT_LEN;

/// The size of a lock account as allocated by the client
pub const LOCK_ACCOUNT_LEN: usize = LOCK_RECORD_MIN_LEN + UNLOCK_TIME_LEN;

impl LockRecord {
    /// Decodes account data fetched from the chain.
    ///
    /// Fields are sliced at fixed byte offsets; everything past the amount is
    /// kept verbatim as the unlock time. The input is never modified.
    pub fn unpack(src: &[u8]) -> Result<Self, DecodeError> {
        if src.len() < LOCK_RECORD_MIN_LEN {
            return Err(DecodeError::TooShort {
                len: src.len(),
                min: LOCK_RECORD_MIN_LEN,
            });
        }

        let (head, tail) = src.split_at(UNLOCK_TIME_OFFSET);
        let head = array_ref![head, 0, LOCK_RECORD_MIN_LEN];
        let (initialized_src, owner_src, amount_src) =
            array_refs![head, INITIALIZED_LEN, OWNER_LEN, AMOUNT_LEN];

        let initialized = unpack_flag(initialized_src, "initialized", INITIALIZED_OFFSET)?;
        let owner = Pubkey::new_from_array(*owner_src);
        let amount = unpack_u64_be(amount_src);

        Ok(LockRecord {
            initialized,
            owner,
            amount,
            unlock_time: tail.to_vec(),
        })
    }

    /// Whether the program has initialized the lock
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The account that created the lock
    pub fn owner(&self) -> &Pubkey {
        &self.owner
    }

    /// The owner key as lowercase hex
    pub fn owner_hex(&self) -> String {
        hex::encode(self.owner.as_ref())
    }

    /// Locked amount in lamports
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Raw unlock time bytes, exactly as stored on chain
    pub fn unlock_time(&self) -> &[u8] {
        &self.unlock_time
    }

    /// Raw unlock time as lowercase hex
    pub fn unlock_time_hex(&self) -> String {
        hex::encode(&self.unlock_time)
    }

    /// Interprets the unlock time as a big-endian unix timestamp.
    ///
    /// Returns `None` unless the tail is exactly [`UNLOCK_TIME_LEN`] bytes.
    pub fn unlock_timestamp(&self) -> Option<UnixTimestamp> {
        let bytes: [u8; UNLOCK_TIME_LEN] = self.unlock_time.as_slice().try_into().ok()?;
        Some(UnixTimestamp::from_be_bytes(bytes))
    }

    /// Number of bytes this record was decoded from
    pub fn packed_len(&self) -> usize {
        LOCK_RECORD_MIN_LEN + self.unlock_time.len()
    }
}

impl TryFrom<&[u8]> for LockRecord {
    type Error = DecodeError;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        LockRecord::unpack(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(flag: u8, owner: [u8; 32], amount: [u8; 8], tail: &[u8]) -> Vec<u8> {
        let mut data = vec![flag];
        data.extend_from_slice(&owner);
        data.extend_from_slice(&amount);
        data.extend_from_slice(tail);
        data
    }

    #[test]
    fn decodes_uninitialized_record() {
        let data = buffer(0, [0; 32], [0, 0, 0, 0, 0, 0, 0, 1], &[0xff]);

        let record = LockRecord::unpack(&data).unwrap();

        assert!(!record.is_initialized());
        assert_eq!(record.owner_hex(), "00".repeat(32));
        assert_eq!(record.owner(), &Pubkey::default());
        assert_eq!(record.amount(), 1);
        assert_eq!(record.unlock_time_hex(), "ff");
        assert_eq!(record.unlock_time(), &[0xff]);
    }

    #[test]
    fn decodes_initialized_record() {
        let data = buffer(
            1,
            [0xaa; 32],
            [0, 0, 0, 0, 0, 0, 0x03, 0xe8],
            &[0, 0, 0, 1],
        );

        let record = LockRecord::unpack(&data).unwrap();

        assert!(record.is_initialized());
        assert_eq!(record.owner_hex(), "aa".repeat(32));
        assert_eq!(record.owner(), &Pubkey::new_from_array([0xaa; 32]));
        assert_eq!(record.amount(), 1000);
        assert_eq!(record.unlock_time_hex(), "00000001");
    }

    #[test]
    fn rejects_every_length_below_minimum() {
        let data = [1u8; LOCK_RECORD_MIN_LEN];
        for len in 0..LOCK_RECORD_MIN_LEN {
            assert_eq!(
                LockRecord::unpack(&data[..len]),
                Err(DecodeError::TooShort {
                    len,
                    min: LOCK_RECORD_MIN_LEN
                })
            );
        }
    }

    #[test]
    fn minimum_length_has_empty_unlock_time() {
        let data = buffer(1, [7; 32], [0; 8], &[]);

        let record = LockRecord::unpack(&data).unwrap();

        assert_eq!(record.unlock_time_hex(), "");
        assert_eq!(record.unlock_timestamp(), None);
        assert_eq!(record.packed_len(), LOCK_RECORD_MIN_LEN);
    }

    #[test]
    fn rejects_bad_initialized_flag() {
        let data = buffer(2, [0; 32], [0; 8], &[]);

        let err = LockRecord::unpack(&data).unwrap_err();

        assert_eq!(err.field(), Some("initialized"));
        assert!(matches!(
            err,
            DecodeError::MalformedField {
                offset: INITIALIZED_OFFSET,
                ..
            }
        ));
    }

    #[test]
    fn decoding_is_deterministic_and_leaves_input_untouched() {
        let data = buffer(1, [0x5c; 32], [9, 8, 7, 6, 5, 4, 3, 2], &[1, 2, 3]);
        let before = data.clone();

        let first = LockRecord::unpack(&data).unwrap();
        let second = LockRecord::try_from(data.as_slice()).unwrap();

        assert_eq!(first, second);
        assert_eq!(data, before);
        assert_eq!(first.packed_len(), data.len());
    }

    #[test]
    fn owner_bytes_only_affect_owner() {
        let data = buffer(1, [0x11; 32], [0, 0, 0, 0, 0, 0, 0, 42], &[0xde, 0xad]);
        let base = LockRecord::unpack(&data).unwrap();

        for i in OWNER_OFFSET..AMOUNT_OFFSET {
            let mut changed = data.clone();
            changed[i] ^= 0xff;
            let record = LockRecord::unpack(&changed).unwrap();

            assert_ne!(record.owner(), base.owner());
            assert_eq!(record.is_initialized(), base.is_initialized());
            assert_eq!(record.amount(), base.amount());
            assert_eq!(record.unlock_time(), base.unlock_time());
        }
    }

    #[test]
    fn eight_byte_tail_reads_as_timestamp() {
        let deadline: UnixTimestamp = 1_700_000_000;
        let data = buffer(1, [3; 32], 5u64.to_be_bytes(), &deadline.to_be_bytes());
        assert_eq!(data.len(), LOCK_ACCOUNT_LEN);

        let record = LockRecord::unpack(&data).unwrap();

        assert_eq!(record.unlock_timestamp(), Some(deadline));
        assert_eq!(record.unlock_time(), &deadline.to_be_bytes());
    }

    #[test]
    fn other_tail_lengths_have_no_timestamp() {
        let data = buffer(1, [3; 32], [0; 8], &[0; 9]);
        let record = LockRecord::unpack(&data).unwrap();
        assert_eq!(record.unlock_timestamp(), None);
        assert_eq!(record.unlock_time_hex(), "00".repeat(9));
    }
}

use lock_interface::error::{DecodeError, LockProgramError};
use solana_client::client_error::ClientError as RpcError;
use solana_program::clock::UnixTimestamp;
use solana_sdk::{instruction::InstructionError, pubkey::Pubkey, transaction::TransactionError};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("rpc request failed: {0}")]
    Rpc(Box<RpcError>),
    #[error("lock program rejected the transaction: {0} ({})", .0.describe())]
    Program(LockProgramError),
    #[error("failed to decode lock account {account} ({len} bytes, data {data:?}): {source}")]
    Decode {
        account: Pubkey,
        len: usize,
        /// Account data as lowercase hex
        data: String,
        #[source]
        source: DecodeError,
    },
    #[error("unlock time {unlock_at} is {wait} seconds away, more than the {max_wait} second limit")]
    UnlockTooFar {
        unlock_at: UnixTimestamp,
        wait: u64,
        max_wait: u64,
    },
    #[error("invalid SOL amount {0}: must be finite and positive")]
    InvalidSolAmount(f64),
}

impl ClientError {
    /// Wraps a decode failure together with the raw account data it came from
    pub fn decode(account: &Pubkey, data: &[u8], source: DecodeError) -> Self {
        let len = data.len();
        let data = hex::encode(data);
        error!(
            %account,
            field = source.field().unwrap_or("-"),
            len,
            %data,
            "failed to decode lock account"
        );
        ClientError::Decode {
            account: *account,
            len,
            data,
            source,
        }
    }
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        match err.get_transaction_error() {
            Some(TransactionError::InstructionError(_, InstructionError::Custom(code))) => {
                match LockProgramError::from_code(code) {
                    Some(program_err) => ClientError::Program(program_err),
                    None => ClientError::Rpc(Box::new(err)),
                }
            }
            _ => ClientError::Rpc(Box::new(err)),
        }
    }
}

use std::{fs, path::PathBuf, str::FromStr};

use clap::Args;
use lock_interface::instruction::lock_account_address;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    native_token::LAMPORTS_PER_SOL,
    pubkey::{Pubkey, MAX_SEED_LEN},
    signature::Keypair,
    signer::Signer,
};
use thiserror::Error;

const URL_TESTNET: &str = "https://api.testnet.solana.com";
const URL_DEVNET: &str = "https://api.devnet.solana.com";
const URL_LOCAL: &str = "http://127.0.0.1:8899";

pub const DEFAULT_MAX_WAIT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no program id given (set PROGRAM_ID or pass --program-id)")]
    MissingProgramId,
    #[error("invalid program id {0:?}")]
    InvalidProgramId(String),
    #[error("no key material given (set SECRET_KEY or KEYPAIR_PATH)")]
    MissingKeypair,
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),
    #[error("failed to read keypair file {path}: {reason}")]
    KeypairFile { path: PathBuf, reason: String },
    #[error("invalid commitment {0:?} (expected processed, confirmed or finalized)")]
    InvalidCommitment(String),
    #[error("invalid lock seed {0:?}: must be at most {} bytes", MAX_SEED_LEN)]
    InvalidSeed(String),
    #[error("lock amount must be greater than zero")]
    ZeroAmount,
}

/// Raw settings as given on the command line or through the environment
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// RPC endpoint, or one of: local, devnet, testnet
    #[arg(long, env = "RPC_URL", default_value = "local")]
    pub url: String,
    /// Address of the deployed lock program
    #[arg(long, env = "PROGRAM_ID")]
    pub program_id: Option<String>,
    /// Locker secret key as comma-separated bytes
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
    /// Path to a Solana CLI keypair file, used when no secret key is given
    #[arg(long = "keypair", env = "KEYPAIR_PATH")]
    pub keypair_path: Option<PathBuf>,
    /// Seed the lock account address is derived from
    #[arg(long, env = "LOCK_SEED", default_value = "lock")]
    pub seed: String,
    /// Lamports to fund and lock
    #[arg(long, env = "LOCK_AMOUNT", default_value_t = LAMPORTS_PER_SOL)]
    pub amount: u64,
    /// Commitment level for reads and confirmations: processed, confirmed or finalized
    #[arg(long, env = "COMMITMENT", default_value = "confirmed")]
    pub commitment: String,
    /// Longest wait for the unlock time, in seconds, before giving up
    #[arg(long, env = "MAX_WAIT_SECS", default_value_t = DEFAULT_MAX_WAIT_SECS)]
    pub max_wait: u64,
}

/// Validated client configuration
pub struct Config {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub locker: Keypair,
    pub seed: String,
    pub lock_account: Pubkey,
    pub amount: u64,
    pub commitment: CommitmentConfig,
    pub max_wait: u64,
}

impl Config {
    pub fn from_args(args: ConfigArgs) -> Result<Self, ConfigError> {
        let rpc_url = resolve_url(&args.url);

        let program_id = args.program_id.ok_or(ConfigError::MissingProgramId)?;
        let program_id = Pubkey::from_str(program_id.trim())
            .map_err(|_| ConfigError::InvalidProgramId(program_id.clone()))?;

        let locker = match (args.secret_key, args.keypair_path) {
            (Some(secret), _) => keypair_from_secret(&secret)?,
            (None, Some(path)) => keypair_from_file(path)?,
            (None, None) => return Err(ConfigError::MissingKeypair),
        };

        if args.seed.len() > MAX_SEED_LEN {
            return Err(ConfigError::InvalidSeed(args.seed));
        }
        let lock_account = lock_account_address(&locker.pubkey(), &args.seed, &program_id)
            .map_err(|_| ConfigError::InvalidSeed(args.seed.clone()))?;

        if args.amount == 0 {
            return Err(ConfigError::ZeroAmount);
        }

        let commitment = parse_commitment(&args.commitment)?;

        Ok(Config {
            rpc_url,
            program_id,
            locker,
            seed: args.seed,
            lock_account,
            amount: args.amount,
            commitment,
            max_wait: args.max_wait,
        })
    }
}

pub fn resolve_url(url: &str) -> String {
    match url {
        "local" | "localhost" => URL_LOCAL.to_string(),
        "devnet" => URL_DEVNET.to_string(),
        "testnet" => URL_TESTNET.to_string(),
        other => other.to_string(),
    }
}

fn parse_commitment(s: &str) -> Result<CommitmentConfig, ConfigError> {
    match s {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(ConfigError::InvalidCommitment(other.to_string())),
    }
}

/// Parses `1,2,3,...`, with or without surrounding brackets.
fn keypair_from_secret(secret: &str) -> Result<Keypair, ConfigError> {
    let bytes = secret
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|value| {
            value
                .trim()
                .parse::<u8>()
                .map_err(|_| ConfigError::InvalidSecretKey(format!("{:?} is not a byte", value.trim())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Keypair::from_bytes(&bytes).map_err(|err| ConfigError::InvalidSecretKey(err.to_string()))
}

fn keypair_from_file(path: PathBuf) -> Result<Keypair, ConfigError> {
    let keypair_file_err = |reason: String| ConfigError::KeypairFile {
        path: path.clone(),
        reason,
    };

    let contents = fs::read_to_string(&path).map_err(|err| keypair_file_err(err.to_string()))?;
    let bytes: Vec<u8> =
        serde_json::from_str(&contents).map_err(|err| keypair_file_err(err.to_string()))?;

    Keypair::from_bytes(&bytes).map_err(|err| keypair_file_err(err.to_string()))
}

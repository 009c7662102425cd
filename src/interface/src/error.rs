//! Error types for lock account decoding and the lock program's custom errors

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Failure to decode lock account data
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The buffer is shorter than the fixed lock account layout
    #[error("account data too short: {len} bytes, need at least {min}")]
    TooShort {
        /// Length of the buffer that was passed in
        len: usize,
        /// Minimum layout length
        min: usize,
    },
    /// A field's bytes don't form a valid value
    #[error("malformed field `{field}` at offset {offset}: {reason}")]
    MalformedField {
        /// Name of the offending field
        field: &'static str,
        /// Byte offset of the field in the account data
        offset: usize,
        /// What was wrong with it
        reason: String,
    },
}

impl DecodeError {
    /// The field that failed to decode, if the failure is field-specific
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::TooShort { .. } => None,
            DecodeError::MalformedField { field, .. } => Some(*field),
        }
    }
}

/// Custom errors returned by the lock program as `ProgramError::Custom`
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum LockProgramError {
    /// The unlock time has not been reached yet
    #[error("EarlyUnlock")]
    EarlyUnlock = 0,
}

impl LockProgramError {
    /// Look up a custom error code reported by the program
    pub fn from_code(code: u32) -> Option<Self> {
        FromPrimitive::from_u32(code)
    }

    /// Human readable explanation for logs
    pub fn describe(&self) -> &'static str {
        match self {
            LockProgramError::EarlyUnlock => "Cannot unlock before the unlock time is reached.",
        }
    }
}

impl From<LockProgramError> for ProgramError {
    fn from(e: LockProgramError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_code_zero_is_early_unlock() {
        assert_eq!(
            LockProgramError::from_code(0),
            Some(LockProgramError::EarlyUnlock)
        );
        assert_eq!(LockProgramError::from_code(42), None);
    }

    #[test]
    fn converts_into_program_error() {
        let err: ProgramError = LockProgramError::EarlyUnlock.into();
        assert_eq!(err, ProgramError::Custom(0));
    }

    #[test]
    fn field_is_reported_for_malformed_fields_only() {
        let short = DecodeError::TooShort { len: 3, min: 41 };
        assert_eq!(short.field(), None);
        assert_eq!(
            short.to_string(),
            "account data too short: 3 bytes, need at least 41"
        );

        let bad = DecodeError::MalformedField {
            field: "initialized",
            offset: 0,
            reason: "expected 0 or 1, got 7".to_string(),
        };
        assert_eq!(bad.field(), Some("initialized"));
    }
}

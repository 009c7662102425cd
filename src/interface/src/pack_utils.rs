use crate::error::DecodeError;

/// Reads a one-byte boolean. Anything other than 0 or 1 is rejected rather than
/// coerced.
pub fn unpack_flag(src: &[u8; 1], field: &'static str, offset: usize) -> Result<bool, DecodeError> {
    match src[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DecodeError::MalformedField {
            field,
            offset,
            reason: format!("expected 0 or 1, got {}", other),
        }),
    }
}

/// Reads an 8-byte big-endian unsigned integer.
pub fn unpack_u64_be(src: &[u8; 8]) -> u64 {
    u64::from_be_bytes(*src)
}

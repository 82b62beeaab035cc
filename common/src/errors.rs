use thiserror::Error;

/// Errors produced while parsing `0x`-prefixed hex quantities and byte strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("missing 0x prefix: {0}")]
    MissingPrefix(String),
    #[error("empty hex quantity")]
    Empty,
    #[error("hex quantity has leading zeros: {0}")]
    LeadingZeros(String),
    #[error("invalid hex digits: {0}")]
    InvalidDigits(String),
    #[error("hex quantity does not fit in 64 bits: {0}")]
    Overflow(String),
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

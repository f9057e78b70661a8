//! Core error types.

use thiserror::Error;

/// Errors related to parsing, validation, or construction of core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Hex string had an unexpected byte length.
    #[error("invalid hex length: expected {expected} bytes, got {got} bytes")]
    InvalidHexLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        got: usize,
    },

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Input ended before a complete value could be decoded.
    #[error("truncated input: expected {expected} bytes, got {got} bytes")]
    TruncatedInput {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes available.
        got: usize,
    },

    /// A value violated protocol constraints.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

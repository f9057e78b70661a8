//! Consensus error types.

use thiserror::Error;

/// Errors returned by consensus arithmetic and validation helpers.
///
/// Consensus *rejections* (a hash failing its target, a decode flag set)
/// are ordinary `false`/flag results, not errors; these variants cover
/// malformed inputs to the helper APIs.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Invalid compact target encoding in `bits`.
    #[error("invalid compact target bits")]
    InvalidBits,

    /// Target decoded to zero or otherwise unusable.
    #[error("invalid difficulty target")]
    InvalidTarget,

    /// Hex literal did not parse into a 256-bit value.
    #[error("invalid 256-bit hex literal")]
    InvalidHex,
}

//! Protocol-wide constants.

/// Length in bytes of a 32-byte hash.
pub const HASH32_LEN: usize = 32;

/// Serialized block header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Current block header version.
///
/// Headers below this version predate the in-version algo tag; their
/// proof kind is recovered from `nonce` (zero for proof-of-stake).
pub const CURRENT_VERSION: u32 = 9;

/// Number of atomic units per coin.
pub const COIN: i64 = 100_000_000;

/// Final (non-replaceable) transaction input sequence number.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

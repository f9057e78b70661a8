// Consensus-critical. Changes require spec update + tests.
//! Proof algorithm tags.
//!
//! Hybrid blocks name their proof algorithm in the upper three bits of the
//! header version. Headers older than [`CURRENT_VERSION`] predate the tag;
//! for those the proof kind is recovered from the nonce (stake blocks carry
//! a zero nonce) and the algorithm is unknown (`None`), which downstream
//! code treats as Quark where a concrete algorithm is required.

use crate::constants::{CURRENT_VERSION, HEADER_SIZE};

/// Mask selecting the algo tag bits of a header version.
pub const VERSION_ALGO: u32 = 7 << 29;
/// Tag: proof-of-stake.
pub const VERSION_POS: u32 = 1 << 29;
/// Tag: Quark proof-of-work.
pub const VERSION_POW_QUARK: u32 = 2 << 29;
/// Tag: Scrypt² proof-of-work.
pub const VERSION_POW_SCRYPT_SQUARED: u32 = 3 << 29;
/// Tag: SHA1D proof-of-work.
pub const VERSION_POW_SHA1D: u32 = 4 << 29;
/// Tag: Argon2d proof-of-work.
pub const VERSION_POW_ARGON2D: u32 = 5 << 29;
/// Mask matching any proof-of-work tag (either of the two high tag bits).
pub const VERSION_POW: u32 = 6 << 29;

/// Number of algorithm slots (stake plus the four work algorithms).
pub const ALGO_COUNT: usize = 5;

/// Closed set of proof algorithms.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Algo {
    /// Proof-of-stake.
    Pos = 0,
    /// Quark proof-of-work.
    PowQuark = 1,
    /// Scrypt² proof-of-work.
    PowScryptSquared = 2,
    /// Double-SHA1 proof-of-work.
    PowSha1d = 3,
    /// Argon2d proof-of-work.
    PowArgon2d = 4,
}

impl Algo {
    /// Recover the algorithm from a header version, `None` for legacy and
    /// reserved tags.
    pub fn from_version(version: u32) -> Option<Algo> {
        match version & VERSION_ALGO {
            VERSION_POS => Some(Algo::Pos),
            VERSION_POW_QUARK => Some(Algo::PowQuark),
            VERSION_POW_SCRYPT_SQUARED => Some(Algo::PowScryptSquared),
            VERSION_POW_SHA1D => Some(Algo::PowSha1d),
            VERSION_POW_ARGON2D => Some(Algo::PowArgon2d),
            _ => None,
        }
    }

    /// Version tag bits for this algorithm.
    pub fn version_bits(self) -> u32 {
        match self {
            Algo::Pos => VERSION_POS,
            Algo::PowQuark => VERSION_POW_QUARK,
            Algo::PowScryptSquared => VERSION_POW_SCRYPT_SQUARED,
            Algo::PowSha1d => VERSION_POW_SHA1D,
            Algo::PowArgon2d => VERSION_POW_ARGON2D,
        }
    }

    /// Index into per-algorithm tables (pow limits, hash functions).
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Stake predicate over raw header fields.
///
/// Tagged versions use the tag; legacy versions mark stake with nonce 0.
pub fn is_proof_of_stake(version: u32, nonce: u32) -> bool {
    (version & VERSION_ALGO) == VERSION_POS || (version < CURRENT_VERSION && nonce == 0)
}

/// Work predicate over raw header fields.
pub fn is_proof_of_work(version: u32, nonce: u32) -> bool {
    (version & VERSION_POW) != 0 || (version < CURRENT_VERSION && nonce != 0)
}

/// A proof-of-work hash primitive over the 80-byte serialized header.
pub type PowHashFn = fn(&[u8; HEADER_SIZE]) -> [u8; 32];

/// Table of proof-of-work hash primitives, supplied by the embedder.
///
/// The primitives themselves are external collaborators; this crate only
/// routes headers to the right one.
#[derive(Clone, Copy)]
pub struct AlgoHashes {
    /// Quark; also hashes legacy and stake headers.
    pub quark: PowHashFn,
    /// Scrypt² (N = 1048576).
    pub scrypt_squared: PowHashFn,
    /// Double SHA-1.
    pub sha1d: PowHashFn,
    /// Argon2d.
    pub argon2d: PowHashFn,
}

impl AlgoHashes {
    /// Hash function for an algo tag; legacy/stake fall back to Quark.
    pub fn for_algo(&self, algo: Option<Algo>) -> PowHashFn {
        match algo {
            Some(Algo::PowScryptSquared) => self.scrypt_squared,
            Some(Algo::PowSha1d) => self.sha1d,
            Some(Algo::PowArgon2d) => self.argon2d,
            _ => self.quark,
        }
    }
}

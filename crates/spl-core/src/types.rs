// Consensus-critical. Changes require spec update + tests.
//! Canonical protocol types.
//!
//! All types here are consensus-visible and must remain backward-compatible
//! once released. Hashes follow the classic convention: the in-memory byte
//! order is the raw digest (as serialized on the wire), while hex display
//! and parsing use the reversed, "display" order.

use crate::algo::{self, Algo, AlgoHashes};
use crate::constants::*;
use crate::error::CoreError;
use crate::serialization::{serialize_header, sha256d};
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-size 32-byte hash used throughout the protocol.
///
/// Stored in wire order; `Display`/`FromStr` use display (reversed) order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hash32(pub [u8; HASH32_LEN]);

impl Hash32 {
    /// Returns an all-zero hash.
    pub const fn zero() -> Self {
        Self([0u8; HASH32_LEN])
    }

    /// Returns the underlying byte array (wire order).
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }

    /// True if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH32_LEN]
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({self})")
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display = self.0;
        display.reverse();
        f.write_str(&hex::encode(display))
    }
}

impl From<[u8; HASH32_LEN]> for Hash32 {
    fn from(value: [u8; HASH32_LEN]) -> Self {
        Self(value)
    }
}

impl FromStr for Hash32 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH32_LEN {
            return Err(CoreError::InvalidHexLength {
                expected: HASH32_LEN,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; HASH32_LEN];
        arr.copy_from_slice(&bytes);
        arr.reverse();
        Ok(Self(arr))
    }
}

/// Block hash type.
pub type BlockHash = Hash32;

/// Transaction identifier type.
pub type TxId = Hash32;

/// Amount in atomic units (1 coin = [`COIN`] units).
pub type Amount = i64;

/// Reference to a transaction output.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct OutPoint {
    /// Transaction the output belongs to.
    pub txid: TxId,
    /// Output index within that transaction.
    pub vout: u32,
}

impl OutPoint {
    /// The null outpoint used by coinbase inputs.
    pub const fn null() -> Self {
        Self {
            txid: Hash32::zero(),
            vout: 0xffff_ffff,
        }
    }

    /// True for the coinbase null outpoint.
    pub fn is_null(&self) -> bool {
        self.txid.is_zero() && self.vout == 0xffff_ffff
    }
}

/// Transaction input.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TxIn {
    /// Spent output (null for coinbase).
    pub prevout: OutPoint,
    /// Unlocking script.
    pub script_sig: Vec<u8>,
    /// Sequence number.
    pub sequence: u32,
}

/// Transaction output.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TxOut {
    /// Value in atomic units.
    pub value: Amount,
    /// Locking script.
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    /// An empty output (zero value, empty script), as used by the
    /// unspendable genesis coinbase.
    pub const fn empty() -> Self {
        Self {
            value: 0,
            script_pubkey: Vec::new(),
        }
    }

    /// True if the output carries no value and no script.
    pub fn is_empty(&self) -> bool {
        self.value == 0 && self.script_pubkey.is_empty()
    }
}

/// Transaction.
///
/// Carries a timestamp after the version, in the peercoin lineage.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    /// Transaction format version.
    pub version: i32,
    /// Transaction timestamp (Unix seconds).
    pub time: u32,
    /// Inputs.
    pub inputs: Vec<TxIn>,
    /// Outputs.
    pub outputs: Vec<TxOut>,
    /// Lock time.
    pub lock_time: u32,
}

impl Transaction {
    /// True for a coinbase transaction (single null-prevout input).
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }
}

/// Block header containing consensus-critical metadata.
///
/// Serializes to exactly [`HEADER_SIZE`] bytes, little-endian, in field
/// order: version, prev, merkle root, time, bits, nonce.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockHeader {
    /// Header version; the upper three bits carry the algo tag.
    pub version: u32,
    /// Hash of the previous block.
    pub prev_block: BlockHash,
    /// Merkle root of transaction identifiers.
    pub merkle_root: Hash32,
    /// Block timestamp (Unix seconds).
    pub time: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce; zero on proof-of-stake blocks.
    pub nonce: u32,
}

impl BlockHeader {
    /// Proof kind: stake. Two block generations encode this differently;
    /// pre-tag versions use a zero nonce as the stake marker.
    pub fn is_proof_of_stake(&self) -> bool {
        algo::is_proof_of_stake(self.version, self.nonce)
    }

    /// Proof kind: work.
    pub fn is_proof_of_work(&self) -> bool {
        algo::is_proof_of_work(self.version, self.nonce)
    }

    /// Algorithm tag carried in the version bits, if any.
    ///
    /// `None` for legacy (pre-tag) and reserved versions.
    pub fn algo(&self) -> Option<Algo> {
        Algo::from_version(self.version)
    }

    /// Block timestamp widened for solvetime arithmetic.
    pub fn block_time(&self) -> i64 {
        i64::from(self.time)
    }

    /// Canonical block hash.
    ///
    /// SHA-256d of the serialized header for tagged versions; legacy
    /// version-1 blocks hash with Quark instead.
    pub fn hash(&self, hashes: &AlgoHashes) -> BlockHash {
        if self.version > 1 {
            self.serialize_hash()
        } else {
            Hash32((hashes.quark)(&serialize_header(self)))
        }
    }

    /// SHA-256d of the 80-byte serialized header.
    pub fn serialize_hash(&self) -> BlockHash {
        sha256d(&serialize_header(self))
    }

    /// Mining hash: the algo-tagged proof-of-work digest of the header.
    pub fn pow_hash(&self, hashes: &AlgoHashes) -> Hash32 {
        Hash32(hashes.for_algo(self.algo())(&serialize_header(self)))
    }
}

/// Full block: header, transactions, and the stake block signature.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Block {
    /// Block header.
    pub header: BlockHeader,
    /// Transactions included in this block.
    pub txs: Vec<Transaction>,
    /// Block signature, signed by the coinstake output owner (empty on
    /// proof-of-work blocks).
    pub signature: Vec<u8>,
}

// Consensus-critical. Changes require spec update + tests.
//! Back-linked block index.
//!
//! The index is a DAG with `prev` edges only; nodes are immutable once
//! published and shared by reference counting. The retargeter walks it
//! backwards, filtering by proof kind or by algorithm, and never mutates.

use spl_core::{algo, Algo, BlockHash};
use std::sync::Arc;

/// One node of the block index: the header fields retargeting reads, the
/// height, and the back pointer.
#[derive(Clone, Debug)]
pub struct BlockIndex {
    /// Previous block, `None` only for genesis.
    pub prev: Option<Arc<BlockIndex>>,
    /// Height of this block (genesis is 0).
    pub height: u32,
    /// Header version (carries the algo tag).
    pub version: u32,
    /// Compact difficulty target of this block.
    pub bits: u32,
    /// Block timestamp (Unix seconds).
    pub time: u32,
    /// Header nonce; zero marks stake on pre-tag versions.
    pub nonce: u32,
    /// Hash of this block.
    pub block_hash: BlockHash,
}

impl BlockIndex {
    /// Proof kind: stake.
    pub fn is_proof_of_stake(&self) -> bool {
        algo::is_proof_of_stake(self.version, self.nonce)
    }

    /// Proof kind: work.
    pub fn is_proof_of_work(&self) -> bool {
        algo::is_proof_of_work(self.version, self.nonce)
    }

    /// Algorithm tag, `None` for legacy versions.
    pub fn algo(&self) -> Option<Algo> {
        Algo::from_version(self.version)
    }

    /// Timestamp widened for solvetime arithmetic.
    pub fn block_time(&self) -> i64 {
        i64::from(self.time)
    }
}

/// Walk back to the most recent block of the wanted proof kind.
///
/// Stops at the first match, or at genesis when no ancestor matches; the
/// returned node may therefore still mismatch and callers must test.
pub fn last_block_index(start: Option<&BlockIndex>, proof_of_stake: bool) -> Option<&BlockIndex> {
    let mut index = start?;
    while index.is_proof_of_stake() != proof_of_stake {
        match index.prev.as_deref() {
            Some(prev) => index = prev,
            None => break,
        }
    }
    Some(index)
}

/// Walk back to the most recent block of the wanted algorithm.
///
/// Same contract as [`last_block_index`]: never crosses genesis, and the
/// result may mismatch when the whole ancestry does.
pub fn last_block_index_for_algo(start: Option<&BlockIndex>, algo: Algo) -> Option<&BlockIndex> {
    let mut index = start?;
    while index.algo() != Some(algo) {
        match index.prev.as_deref() {
            Some(prev) => index = prev,
            None => break,
        }
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_core::{VERSION_POS, VERSION_POW_QUARK, VERSION_POW_SCRYPT_SQUARED};

    fn node(prev: Option<Arc<BlockIndex>>, height: u32, version: u32, nonce: u32) -> Arc<BlockIndex> {
        Arc::new(BlockIndex {
            prev,
            height,
            version,
            bits: 0x1f00_ffff,
            time: 1_000_000 + height * 80,
            nonce,
            block_hash: BlockHash::zero(),
        })
    }

    #[test]
    fn filters_by_kind() {
        let genesis = node(None, 0, 1, 1);
        let pos = node(Some(genesis.clone()), 1, VERSION_POS | 9, 0);
        let pow = node(Some(pos.clone()), 2, VERSION_POW_QUARK | 9, 7);

        let found = last_block_index(Some(&pow), true).expect("some");
        assert_eq!(found.height, 1);
        let found = last_block_index(Some(&pow), false).expect("some");
        assert_eq!(found.height, 2);
    }

    #[test]
    fn filters_by_algo() {
        let genesis = node(None, 0, 1, 1);
        let quark = node(Some(genesis.clone()), 1, VERSION_POW_QUARK | 9, 7);
        let scrypt = node(Some(quark.clone()), 2, VERSION_POW_SCRYPT_SQUARED | 9, 7);

        let found = last_block_index_for_algo(Some(&scrypt), Algo::PowQuark).expect("some");
        assert_eq!(found.height, 1);
        let found =
            last_block_index_for_algo(Some(&scrypt), Algo::PowScryptSquared).expect("some");
        assert_eq!(found.height, 2);
    }

    #[test]
    fn never_crosses_genesis() {
        let genesis = node(None, 0, VERSION_POW_QUARK | 9, 7);
        let tip = node(Some(genesis.clone()), 1, VERSION_POW_QUARK | 9, 7);

        // No stake ancestor exists: the walk parks on genesis, mismatched.
        let found = last_block_index(Some(&tip), true).expect("some");
        assert_eq!(found.height, 0);
        assert!(!found.is_proof_of_stake());

        let found = last_block_index_for_algo(Some(&tip), Algo::PowSha1d).expect("some");
        assert_eq!(found.height, 0);
    }

    #[test]
    fn null_start_stays_null() {
        assert!(last_block_index(None, true).is_none());
        assert!(last_block_index_for_algo(None, Algo::PowQuark).is_none());
    }
}

// Consensus-critical. Changes require spec update + tests.
//! Canonical wire serialization.
//!
//! Rule: all consensus-critical objects use the little-endian wire format;
//! hashing and signing always go through these encoders. Headers are exactly
//! 80 bytes; transactions use compact-size counts.

use crate::constants::{HASH32_LEN, HEADER_SIZE};
use crate::error::CoreError;
use crate::types::{Block, BlockHeader, Hash32, Transaction, TxId};
use sha2::{Digest, Sha256};

/// Append a compact-size count.
pub fn write_compact_size(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x10000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Serialize a block header into its canonical 80-byte form.
pub fn serialize_header(header: &BlockHeader) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out[0..4].copy_from_slice(&header.version.to_le_bytes());
    out[4..36].copy_from_slice(header.prev_block.as_bytes());
    out[36..68].copy_from_slice(header.merkle_root.as_bytes());
    out[68..72].copy_from_slice(&header.time.to_le_bytes());
    out[72..76].copy_from_slice(&header.bits.to_le_bytes());
    out[76..80].copy_from_slice(&header.nonce.to_le_bytes());
    out
}

/// Decode a block header from its canonical 80-byte form.
pub fn deserialize_header(bytes: &[u8]) -> Result<BlockHeader, CoreError> {
    if bytes.len() < HEADER_SIZE {
        return Err(CoreError::TruncatedInput {
            expected: HEADER_SIZE,
            got: bytes.len(),
        });
    }
    let mut hash = [0u8; HASH32_LEN];
    let u32_at = |range: core::ops::Range<usize>| -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[range]);
        u32::from_le_bytes(buf)
    };
    let version = u32_at(0..4);
    hash.copy_from_slice(&bytes[4..36]);
    let prev_block = Hash32(hash);
    hash.copy_from_slice(&bytes[36..68]);
    let merkle_root = Hash32(hash);
    Ok(BlockHeader {
        version,
        prev_block,
        merkle_root,
        time: u32_at(68..72),
        bits: u32_at(72..76),
        nonce: u32_at(76..80),
    })
}

/// Serialize a transaction: version, time, inputs, outputs, lock time.
pub fn serialize_tx(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    out.extend_from_slice(&tx.version.to_le_bytes());
    out.extend_from_slice(&tx.time.to_le_bytes());
    write_compact_size(&mut out, tx.inputs.len() as u64);
    for input in &tx.inputs {
        out.extend_from_slice(input.prevout.txid.as_bytes());
        out.extend_from_slice(&input.prevout.vout.to_le_bytes());
        write_compact_size(&mut out, input.script_sig.len() as u64);
        out.extend_from_slice(&input.script_sig);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }
    write_compact_size(&mut out, tx.outputs.len() as u64);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        write_compact_size(&mut out, output.script_pubkey.len() as u64);
        out.extend_from_slice(&output.script_pubkey);
    }
    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out
}

/// SHA-256d (double SHA-256) of arbitrary bytes.
pub fn sha256d(bytes: &[u8]) -> Hash32 {
    let first = Sha256::digest(bytes);
    let second = Sha256::digest(first);
    let mut arr = [0u8; HASH32_LEN];
    arr.copy_from_slice(&second);
    Hash32(arr)
}

/// Canonical transaction id: SHA-256d of the serialized transaction.
pub fn txid(tx: &Transaction) -> TxId {
    sha256d(&serialize_tx(tx))
}

/// Merkle root over transaction ids: pairwise SHA-256d, odd levels
/// duplicate their last entry. Zero for an empty list.
pub fn merkle_root(txids: &[TxId]) -> Hash32 {
    if txids.is_empty() {
        return Hash32::zero();
    }
    let mut level: Vec<Hash32> = txids.to_vec();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = level[level.len() - 1];
            level.push(last);
        }
        level = level
            .chunks(2)
            .map(|pair| {
                let mut concat = [0u8; 64];
                concat[..32].copy_from_slice(pair[0].as_bytes());
                concat[32..].copy_from_slice(pair[1].as_bytes());
                sha256d(&concat)
            })
            .collect();
    }
    level[0]
}

/// Merkle root of a block's transactions.
pub fn block_merkle_root(block: &Block) -> Hash32 {
    let ids: Vec<TxId> = block.txs.iter().map(txid).collect();
    merkle_root(&ids)
}

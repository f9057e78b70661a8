// Consensus-critical. Changes require spec update + tests.
//! Deterministic genesis construction.
//!
//! The genesis coinbase embeds a news-headline timestamp in its input
//! script. Networks with a zero genesis reward use the original height
//! marker script and an unspendable empty output; networks with a funded
//! genesis use the classic `OP_0 <bits> <4>` prefix and pay the pinned
//! public key.

use crate::error::ParamsError;
use spl_core::script::{ScriptBuilder, OP_0, OP_CHECKSIG};
use spl_core::{
    merkle_root, txid, Amount, Block, BlockHash, BlockHeader, OutPoint, Transaction, TxIn, TxOut,
    SEQUENCE_FINAL,
};

/// Timestamp quote embedded in the genesis coinbase.
pub const GENESIS_TIMESTAMP: &str = "http://www.bbc.co.uk/news/world-us-canada-42926976";

/// Compressed public key paid by funded genesis outputs.
const GENESIS_OUTPUT_PUBKEY: &str =
    "03b95000b2b06e391c058ea14d47ac3c525753c68460864f254ada5a63e27a8134";

/// Timestamp of the genesis coinbase transaction, shared by all networks.
const GENESIS_TX_TIME: u32 = 1_517_690_700;

/// Build a genesis block from explicit constants.
///
/// The block's merkle root is derived from its single coinbase; the
/// previous-block hash is zero. Nothing here is checked against pinned
/// hashes; callers assert separately.
pub fn create_genesis_block(
    timestamp: &str,
    output_script: &[u8],
    time: u32,
    nonce: u32,
    bits: u32,
    version: u32,
    reward: Amount,
) -> Block {
    let (script_sig, output) = if reward == 0 {
        (
            ScriptBuilder::new()
                .push_int(4_867_816)
                .push_num(42)
                .push_data(timestamp.as_bytes())
                .into_bytes(),
            TxOut::empty(),
        )
    } else {
        (
            ScriptBuilder::new()
                .push_opcode(OP_0)
                .push_int(486_604_799)
                .push_num(4)
                .push_data(timestamp.as_bytes())
                .into_bytes(),
            TxOut {
                value: reward,
                script_pubkey: output_script.to_vec(),
            },
        )
    };

    let coinbase = Transaction {
        version: 1,
        time: GENESIS_TX_TIME,
        inputs: vec![TxIn {
            prevout: OutPoint::null(),
            script_sig,
            sequence: SEQUENCE_FINAL,
        }],
        outputs: vec![output],
        lock_time: 0,
    };

    let root = merkle_root(&[txid(&coinbase)]);
    Block {
        header: BlockHeader {
            version,
            prev_block: BlockHash::zero(),
            merkle_root: root,
            time,
            bits,
            nonce,
        },
        txs: vec![coinbase],
        signature: Vec::new(),
    }
}

/// Build a genesis block with the standard timestamp and output script.
pub fn standard_genesis_block(
    time: u32,
    nonce: u32,
    bits: u32,
    version: u32,
    reward: Amount,
) -> Result<Block, ParamsError> {
    let pubkey = hex::decode(GENESIS_OUTPUT_PUBKEY)
        .map_err(|e| ParamsError::Core(spl_core::CoreError::InvalidHex(e)))?;
    let output_script = ScriptBuilder::new()
        .push_data(&pubkey)
        .push_opcode(OP_CHECKSIG)
        .into_bytes();
    Ok(create_genesis_block(
        GENESIS_TIMESTAMP,
        &output_script,
        time,
        nonce,
        bits,
        version,
        reward,
    ))
}

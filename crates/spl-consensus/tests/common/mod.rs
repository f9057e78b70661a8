//! Shared fixtures: hand-built chains and main-like consensus parameters.
#![allow(dead_code)]

use spl_consensus::{Bip9Deployment, BlockIndex, ConsensusParams, DifficultyOverride, Uint256, NO_TIMEOUT};
use spl_core::{Algo, BlockHash, BlockHeader, Hash32};
use std::sync::Arc;

pub fn limit(hex: &str) -> Uint256 {
    Uint256::from_be_hex(hex).expect("valid hex literal")
}

/// Mainnet-shaped consensus parameters, without pulling in the params crate.
pub fn main_like_params() -> ConsensusParams {
    ConsensusParams {
        pow_limit: [
            limit("00000fffff000000000000000000000000000000000000000000000000000000"),
            limit("0000ffff00000000000000000000000000000000000000000000000000000000"),
            limit("001fffff00000000000000000000000000000000000000000000000000000000"),
            limit("000000ffff000000000000000000000000000000000000000000000000000000"),
            limit("0000ffff00000000000000000000000000000000000000000000000000000000"),
        ],
        pow_target_spacing: 80,
        pow_target_timespan: 2 * 60 * 60,
        mandatory_upgrade_block: [1_030_000, 1_450_000],
        upgrade_block_version: [8, 9],
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        miner_confirmation_window: 7_560,
        rule_change_activation_threshold: 7_182,
        subsidy_halving_interval: 100_000,
        segwit_height: 0,
        deployments: [Bip9Deployment {
            bit: 28,
            start_time: 0,
            timeout: NO_TIMEOUT,
        }],
        difficulty_overrides: vec![
            DifficultyOverride {
                height: 1_035_619,
                time: 1_574_157_019,
                algo: Algo::PowScryptSquared,
                prev_hash: "676df2e0427b68622343a0f1fb4e683dfc587ed6d49e5566dcca2dcbb179f5d2"
                    .parse()
                    .expect("hash literal"),
                bits: 0x1f09_9ab7,
            },
            DifficultyOverride {
                height: 1_035_629,
                time: 1_574_158_315,
                algo: Algo::PowScryptSquared,
                prev_hash: "1787ac2c2d10543cdea74c15f1cbbdd95988eeea420cf55c5f50890c208f4f14"
                    .parse()
                    .expect("hash literal"),
                bits: 0x1f03_82e8,
            },
        ],
        experimental_retargeter: None,
    }
}

/// Append a node to a chain.
pub fn extend(
    prev: Option<Arc<BlockIndex>>,
    height: u32,
    version: u32,
    bits: u32,
    time: u32,
    nonce: u32,
) -> Arc<BlockIndex> {
    Arc::new(BlockIndex {
        prev,
        height,
        version,
        bits,
        time,
        nonce,
        block_hash: BlockHash::zero(),
    })
}

/// Build a single-algo chain: `count` nodes ending at `tip_height`, evenly
/// spaced `spacing` seconds apart ending at `tip_time`, all at `bits`.
pub fn uniform_chain(
    count: u32,
    tip_height: u32,
    tip_time: u32,
    spacing: u32,
    version: u32,
    nonce: u32,
    bits: u32,
) -> Arc<BlockIndex> {
    let mut node: Option<Arc<BlockIndex>> = None;
    for i in 0..count {
        let back = count - 1 - i;
        node = Some(extend(
            node,
            tip_height - back,
            version,
            bits,
            tip_time - back * spacing,
            nonce,
        ));
    }
    node.expect("count > 0")
}

/// A candidate header of the given version; only version, time, and nonce
/// matter to retargeting.
pub fn candidate(version: u32, time: u32, nonce: u32) -> BlockHeader {
    BlockHeader {
        version,
        prev_block: Hash32::zero(),
        merkle_root: Hash32::zero(),
        time,
        bits: 0,
        nonce,
    }
}

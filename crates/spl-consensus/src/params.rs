//! Consensus parameters.
//!
//! Immutable for the life of the process; constructed once per network by
//! the params crate and passed by reference into every consensus call.

use crate::arith::Uint256;
use spl_core::{Algo, BlockHash, ALGO_COUNT};
use std::str::FromStr;

/// Sentinel meaning a deployment never times out.
pub const NO_TIMEOUT: i64 = i64::MAX;

/// Height sentinel for "never activates".
pub const NEVER: u32 = u32::MAX;

/// Version-bits deployment slots.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeploymentPos {
    /// Deployment slot reserved for testing.
    TestDummy = 0,
}

/// Number of version-bits deployment slots.
pub const MAX_DEPLOYMENTS: usize = 1;

impl FromStr for DeploymentPos {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testdummy" => Ok(DeploymentPos::TestDummy),
            _ => Err(()),
        }
    }
}

/// One version-bits deployment.
#[derive(Clone, Copy, Debug)]
pub struct Bip9Deployment {
    /// Bit signalled in the header version.
    pub bit: u8,
    /// Start of the signalling window (Unix seconds).
    pub start_time: i64,
    /// End of the signalling window (Unix seconds), or [`NO_TIMEOUT`].
    pub timeout: i64,
}

/// A pinned retarget result for one historical block.
///
/// The live chain accepted a handful of blocks whose difficulty came from
/// a state that cannot be recomputed from headers alone; those values are
/// carried verbatim and matched on (height, time, algo, previous hash).
#[derive(Clone, Debug)]
pub struct DifficultyOverride {
    /// Height of the block being validated.
    pub height: u32,
    /// Its exact header timestamp.
    pub time: u32,
    /// Its proof algorithm.
    pub algo: Algo,
    /// Hash of its same-algo predecessor.
    pub prev_hash: BlockHash,
    /// The compact target to return.
    pub bits: u32,
}

/// Experimental retargeting formulas, selectable on regtest only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExperimentalRetargeter {
    /// Absolutely scheduled exponentially rising targets.
    Asert,
    /// Schedule-deviation controller.
    SimpleTargetFrontier,
    /// Linearly weighted solve-time average.
    Wma,
}

impl FromStr for ExperimentalRetargeter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asert" => Ok(ExperimentalRetargeter::Asert),
            "stf" => Ok(ExperimentalRetargeter::SimpleTargetFrontier),
            "wma" => Ok(ExperimentalRetargeter::Wma),
            _ => Err(()),
        }
    }
}

/// Per-network consensus constants.
#[derive(Clone, Debug)]
pub struct ConsensusParams {
    /// Maximum target (minimum difficulty) per algorithm.
    pub pow_limit: [Uint256; ALGO_COUNT],
    /// Target block spacing in seconds, before per-kind scaling.
    pub pow_target_spacing: u32,
    /// Retarget averaging window in seconds.
    pub pow_target_timespan: u32,
    /// Heights of the two mandatory upgrades.
    pub mandatory_upgrade_block: [u32; 2],
    /// Minimum header version after each upgrade height.
    pub upgrade_block_version: [u32; 2],
    /// Allow minimum-difficulty blocks after a long same-algo gap.
    pub pow_allow_min_difficulty_blocks: bool,
    /// Pin every target at the pow limit (test networks only).
    pub pow_no_retargeting: bool,
    /// Version-bits confirmation window in blocks.
    pub miner_confirmation_window: u32,
    /// Blocks required to lock in a version-bits deployment.
    pub rule_change_activation_threshold: u32,
    /// Blocks between subsidy halvings.
    pub subsidy_halving_interval: u32,
    /// Segwit activation height ([`NEVER`] when disabled).
    pub segwit_height: u32,
    /// Version-bits deployments.
    pub deployments: [Bip9Deployment; MAX_DEPLOYMENTS],
    /// Pinned historical retarget results.
    pub difficulty_overrides: Vec<DifficultyOverride>,
    /// Experimental retargeter selection (regtest only).
    pub experimental_retargeter: Option<ExperimentalRetargeter>,
}

impl ConsensusParams {
    /// Blocks per full retarget interval at the base spacing.
    pub fn difficulty_adjustment_interval(&self) -> u32 {
        self.pow_target_timespan / self.pow_target_spacing
    }
}

// Consensus-critical. Changes require spec update + tests.
//! Proof-of-work validation.

use crate::arith::{bits_to_target, Uint256};
use crate::params::ConsensusParams;
use spl_core::{Algo, Hash32};

/// Validate a mining hash against a compact target.
///
/// Rejects (returns `false`, never errors) when the encoding is negative,
/// zero, or overflowing; when the algorithm is stake or unknown-but-tagged;
/// when the target exceeds the algorithm's pow limit; or when the hash
/// exceeds the target. Legacy headers (`algo == None`) validate against the
/// Quark limit.
pub fn check_proof_of_work(
    hash: &Hash32,
    bits: u32,
    algo: Option<Algo>,
    params: &ConsensusParams,
) -> bool {
    let decoded = bits_to_target(bits);

    // Check range
    if decoded.negative || decoded.target.is_zero() || decoded.overflow {
        return false;
    }
    if algo == Some(Algo::Pos) {
        return false;
    }
    if decoded.target > params.pow_limit[algo.unwrap_or(Algo::PowQuark).index()] {
        return false;
    }

    // Check proof of work matches claimed amount
    Uint256::from_le_bytes(hash.as_bytes()) <= decoded.target
}

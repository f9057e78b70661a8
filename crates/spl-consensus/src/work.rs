// Consensus-critical. Changes require spec update + tests.
//! Work calculation helpers (heaviest-chain selection).

use crate::arith::{bits_to_target, Uint256};
use crate::error::ConsensusError;
use num_bigint::BigUint;
use num_traits::One;

/// Compute per-block work from compact `bits`.
///
/// Work is defined as `work = floor((2^256) / (target + 1))`.
pub fn block_work(bits: u32) -> Result<Uint256, ConsensusError> {
    let decoded = bits_to_target(bits);
    if decoded.negative || decoded.overflow {
        return Err(ConsensusError::InvalidBits);
    }
    if decoded.target.is_zero() {
        return Err(ConsensusError::InvalidTarget);
    }

    let two_256 = BigUint::one() << 256u32;
    let work = two_256 / (decoded.target.as_biguint() + BigUint::one());
    Ok(Uint256::from_biguint_wrapped(work))
}

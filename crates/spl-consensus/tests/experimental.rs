//! Regtest-only experimental retargeters.

mod common;

use common::{candidate, extend, main_like_params, uniform_chain};
use num_bigint::BigUint;
use spl_consensus::{
    bits_to_target, get_next_work_required, target_to_bits_rounded, ExperimentalRetargeter,
    Uint256,
};
use spl_core::VERSION_POW_QUARK;

const STEADY_BITS: u32 = 0x1c0f_ffff;
const POW_SPACING: u32 = 640;

fn to_big(v: &Uint256) -> BigUint {
    BigUint::from_bytes_le(&v.to_le_bytes())
}

fn from_big(v: &BigUint) -> Uint256 {
    let bytes = v.to_bytes_le();
    let mut arr = [0u8; 32];
    arr[..bytes.len()].copy_from_slice(&bytes);
    Uint256::from_le_bytes(&arr)
}

#[test]
fn asert_steady_state_is_identity() {
    let mut params = main_like_params();
    params.experimental_retargeter = Some(ExperimentalRetargeter::Asert);
    let version = VERSION_POW_QUARK | 9;
    let tip = uniform_chain(6, 1_000, 2_000_000, POW_SPACING, version, 1, STEADY_BITS);
    let block = candidate(version, 2_000_100, 1);
    assert_eq!(get_next_work_required(Some(&tip), &block, &params), STEADY_BITS);
}

#[test]
fn asert_full_timespan_late_doubles_the_target() {
    let mut params = main_like_params();
    params.experimental_retargeter = Some(ExperimentalRetargeter::Asert);
    let version = VERSION_POW_QUARK | 9;

    // prev arrived spacing + timespan after prev-prev: one whole-bit shift.
    let a = extend(None, 997, version, STEADY_BITS, 2_000_000, 1);
    let b = extend(Some(a), 998, version, STEADY_BITS, 2_000_640, 1);
    let c = extend(Some(b), 999, version, STEADY_BITS, 2_001_280, 1);
    let tip = extend(Some(c), 1_000, version, STEADY_BITS, 2_001_280 + 640 + 7_200, 1);
    let block = candidate(version, 2_009_220, 1);

    let doubled = {
        let t = to_big(&bits_to_target(STEADY_BITS).target);
        target_to_bits_rounded(&from_big(&(t * 2u32)))
    };
    assert_eq!(get_next_work_required(Some(&tip), &block, &params), doubled);
}

#[test]
fn frontier_applies_the_percentage_controller() {
    let mut params = main_like_params();
    params.experimental_retargeter = Some(ExperimentalRetargeter::SimpleTargetFrontier);
    let version = VERSION_POW_QUARK | 9;

    // Steady window, but the newest solvetime ran 60 seconds long: the
    // controller eases the target by its base 1%.
    let mut node = None;
    let count = 14u32;
    for i in 0..count {
        let back = count - 1 - i;
        let time = if back == 0 {
            2_000_000 + 60
        } else {
            2_000_000 - back * POW_SPACING
        };
        node = Some(extend(node, 1_000 - back, version, STEADY_BITS, time, 1));
    }
    let tip = node.expect("built");
    let block = candidate(version, 2_000_160, 1);

    let eased = {
        let t = to_big(&bits_to_target(STEADY_BITS).target);
        target_to_bits_rounded(&from_big(&(t * 101u32 / 100u32)))
    };
    assert_eq!(get_next_work_required(Some(&tip), &block, &params), eased);
}

#[test]
fn frontier_steady_state_is_identity() {
    let mut params = main_like_params();
    params.experimental_retargeter = Some(ExperimentalRetargeter::SimpleTargetFrontier);
    let version = VERSION_POW_QUARK | 9;
    let tip = uniform_chain(14, 1_000, 2_000_000, POW_SPACING, version, 1, STEADY_BITS);
    let block = candidate(version, 2_000_100, 1);
    assert_eq!(get_next_work_required(Some(&tip), &block, &params), STEADY_BITS);
}

#[test]
fn weighted_average_matches_its_reference_arithmetic() {
    let mut params = main_like_params();
    params.experimental_retargeter = Some(ExperimentalRetargeter::Wma);
    let version = VERSION_POW_QUARK | 9;

    // 32 blocks, steady 640s cadence; the linear weighting reduces to the
    // documented harmonic form.
    let tip = uniform_chain(32, 131, 2_000_000, POW_SPACING, version, 1, STEADY_BITS);
    let block = candidate(version, 2_000_100, 1);
    let out = get_next_work_required(Some(&tip), &block, &params);

    let past_blocks = 11u32; // 7200 / 640
    let weights_sum: u32 = (1..=past_blocks).sum(); // 66
    let target = to_big(&bits_to_target(STEADY_BITS).target);
    let avg = (&target / past_blocks) * past_blocks;
    let actual = u64::from(POW_SPACING) * u64::from(weights_sum);
    let timespan = u64::from(past_blocks) * u64::from(POW_SPACING) * u64::from(weights_sum);
    let expected = target_to_bits_rounded(&from_big(&(avg * actual / timespan)));
    assert_eq!(out, expected);
}

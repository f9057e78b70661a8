// Consensus-critical. Changes require spec update + tests.
//! Difficulty retargeting.
//!
//! Work and stake difficulties are tracked separately, and each work
//! algorithm retargets against its own history: every formula first walks
//! the index back to the candidate's kind (or algorithm), then reasons
//! about the solvetimes between those filtered ancestors.
//!
//! Three height regimes apply, split at the two mandatory upgrade blocks.
//! The two older regimes reproduce the original deployment bug-for-bug:
//! the interval that was fixed before the spacing was rescaled, the
//! solvetime floors, the 256-bit product that silently truncates on
//! overflow for Quark and Scrypt², and the truncating compact encoder.
//! From the second upgrade on, products are taken in 512 bits and targets
//! encode with the round-half-to-even compact form.
//!
//! [`weighted_moving_average_target`], [`asert_target`] and
//! [`simple_target_frontier`] are experiments kept for regtest; the
//! canonical dispatch never selects them.

use crate::arith::{
    bits_to_target, mul_wide, target_to_bits, target_to_bits_rounded, Uint256, Uint512,
};
use crate::chain::{last_block_index, last_block_index_for_algo, BlockIndex};
use crate::params::{ConsensusParams, ExperimentalRetargeter};
use spl_core::{Algo, BlockHeader, ALGO_COUNT};

fn pow_limit_for<'p>(
    params: &'p ConsensusParams,
    algo: Option<Algo>,
    proof_of_stake: bool,
) -> &'p Uint256 {
    let slot = match algo {
        Some(a) => a,
        None if proof_of_stake => Algo::Pos,
        None => Algo::PowQuark,
    };
    &params.pow_limit[slot.index()]
}

fn last_of_same<'a>(
    start: Option<&'a BlockIndex>,
    algo: Option<Algo>,
    proof_of_stake: bool,
) -> Option<&'a BlockIndex> {
    match algo {
        None => last_block_index(start, proof_of_stake),
        Some(a) => last_block_index_for_algo(start, a),
    }
}

/// The filtered predecessor pair every per-block formula anchors on.
///
/// `None` when the chain is too short: the walk found no predecessor with
/// a further predecessor of the same kind, and the caller returns the pow
/// limit for the first few blocks.
fn retarget_anchors<'a>(
    tip: &'a BlockIndex,
    algo: Option<Algo>,
    proof_of_stake: bool,
) -> Option<(&'a BlockIndex, &'a BlockIndex)> {
    let prev = last_of_same(Some(tip), algo, proof_of_stake)?;
    prev.prev.as_ref()?;
    let prev_prev = last_of_same(prev.prev.as_deref(), algo, proof_of_stake)?;
    prev_prev.prev.as_ref()?;
    Some((prev, prev_prev))
}

/// Required compact target for the block following `tip`.
///
/// Dispatches by height regime and proof kind; pure in the ancestor
/// headers and `params`.
pub fn get_next_work_required(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let pow_limit_compact =
        target_to_bits(&params.pow_limit[algo.unwrap_or(Algo::PowQuark).index()]);
    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    if params.pow_no_retargeting {
        return pow_limit_compact;
    }

    if let Some(experimental) = params.experimental_retargeter {
        return match experimental {
            ExperimentalRetargeter::Asert => asert_target(Some(tip), block, params),
            ExperimentalRetargeter::SimpleTargetFrontier => {
                simple_target_frontier(Some(tip), block, params)
            }
            ExperimentalRetargeter::Wma => {
                weighted_moving_average_target(Some(tip), block, params)
            }
        };
    }

    let next_height = tip.height + 1;
    if next_height >= params.mandatory_upgrade_block[1] && params.pow_allow_min_difficulty_blocks {
        if let Some(algo) = algo {
            if let Some(bits) = min_difficulty_rule(tip, block, algo, pow_limit_compact) {
                return bits;
            }
        }
    }

    if block.is_proof_of_stake()
        && next_height >= params.mandatory_upgrade_block[1] + params.miner_confirmation_window
    {
        simple_moving_average_target(Some(tip), block, params)
    } else {
        calculate_next_target_required(Some(tip), block, params)
    }
}

/// Special difficulty rule: after a gap of more than 30 minutes since the
/// last same-algo block (comfortably more than twice the effective work
/// spacing, so retargeting is not disturbed), a limit-difficulty block may
/// be mined. Subsequent blocks resume from the difficulty that was in
/// force before the gap.
fn min_difficulty_rule(
    tip: &BlockIndex,
    block: &BlockHeader,
    algo: Algo,
    pow_limit_compact: u32,
) -> Option<u32> {
    let prev = last_block_index_for_algo(Some(tip), algo)?;
    if prev.height > 10 && block.block_time() > prev.block_time() + 30 * 60 {
        return Some(pow_limit_compact);
    }
    if prev.prev.is_some() && prev.bits == pow_limit_compact {
        // Walk past the run of limit-difficulty blocks to the last block
        // that carried a real target for this algo.
        let mut index: &BlockIndex = prev;
        while index.bits == pow_limit_compact || index.algo() != Some(algo) {
            match index.prev.as_deref() {
                Some(p) => index = p,
                None => break,
            }
        }
        let before = last_block_index_for_algo(index.prev.as_deref(), algo);
        if let Some(before) = before {
            if before.height > 10 {
                // `before` may itself be a limit block; fall back to the
                // target we stopped on rather than propagate the limit.
                return Some(if before.bits != pow_limit_compact {
                    before.bits
                } else {
                    index.bits
                });
            }
        }
    }
    None
}

/// Per-block exponential retarget toward the target spacing.
///
/// `next = prev * ((interval - 1) * spacing + 2 * solvetime) / ((interval + 1) * spacing)`,
/// with the regime-specific spacing, interval, solvetime floors, product
/// width, and compact encoder. Also carries the pinned historical results.
pub fn calculate_next_target_required(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let proof_of_stake = block.is_proof_of_stake();
    let bn_pow_limit = pow_limit_for(params, algo, proof_of_stake);
    let pow_limit_compact = target_to_bits(bn_pow_limit);
    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    let Some((prev, prev_prev)) = retarget_anchors(tip, algo, proof_of_stake) else {
        return pow_limit_compact; // first or second block of this kind
    };

    let mut actual_spacing = prev.block_time() - prev_prev.block_time();

    let mut bn_new = bits_to_target(prev.bits).target;
    let mut target_spacing = i64::from(params.pow_target_spacing);
    let mut target_timespan = i64::from(params.pow_target_timespan);
    // Every regime fixes its own interval; the reciprocal of the EMA gain
    // is (N + 1) / 2 of the equivalent averaging window.
    let interval: i64;

    let next_height = tip.height + 1;
    if next_height < params.mandatory_upgrade_block[0] {
        // The original fork's constants.
        target_spacing = 80;
        target_timespan = 20 * 60;
        interval = target_timespan / target_spacing;

        // Unbounded negative solvetimes would let timestamps in the past
        // drop the difficulty to zero.
        if actual_spacing < 0 {
            actual_spacing = target_spacing;
        }
    } else if next_height < params.mandatory_upgrade_block[1] {
        target_spacing = 80;
        target_timespan = 20 * 60;
        interval = target_timespan / target_spacing;

        // The difficulty was reset when the Scrypt² patch deployed; the
        // first blocks on the new difficulty carry pinned targets.
        for pinned in &params.difficulty_overrides {
            if next_height == pinned.height
                && block.time == pinned.time
                && algo == Some(pinned.algo)
                && prev.block_hash == pinned.prev_hash
            {
                return pinned.bits;
            }
        }

        // The spacing was rescaled (4x work, 2x stake) after the interval
        // had been computed, so the effective interval ran long by the
        // same factor. Kept as deployed.
        if !proof_of_stake {
            target_spacing *= 4;
        } else {
            target_spacing *= 2;
        }

        if actual_spacing < 1 {
            actual_spacing = 1;
        }
    } else {
        // Effective spacing: stake alternates with work at twice the base
        // spacing, and the work half is shared by the work algorithms.
        target_spacing *= 2;
        if !proof_of_stake {
            target_spacing *= ALGO_COUNT as i64 - 1;
        }
        interval = target_timespan / target_spacing;
    }

    // A solvetime at or below -((interval - 1) * spacing / 2) would zero
    // the numerator; this is the lowest value the formula can carry.
    if actual_spacing <= -((interval - 1) * target_spacing / 2) {
        actual_spacing = -((interval - 1) * target_spacing / 2) + 1;
    }

    let numerator = ((interval - 1) * target_spacing + 2 * actual_spacing) as u32;
    let denominator = ((interval + 1) * target_spacing) as u32;

    if next_height < params.mandatory_upgrade_block[1]
        && matches!(algo, Some(Algo::PowQuark) | Some(Algo::PowScryptSquared))
    {
        // These algos retargeted through the 256-bit product while it
        // could overflow; the truncated results are on the chain.
        bn_new = bn_new.wrapping_mul_u32(numerator).div_u32(denominator);
    } else {
        let wide = Uint512::from_u256(&bn_new)
            .mul_u32(numerator)
            .div_u32(denominator);
        bn_new = wide.trim256().0;
    }

    if bn_new > *bn_pow_limit {
        bn_new = bn_pow_limit.clone();
    }

    if next_height < params.mandatory_upgrade_block[1] {
        target_to_bits(&bn_new)
    } else {
        target_to_bits_rounded(&bn_new)
    }
}

/// Weighted target EMA: the bootstrap path while the chain is too short
/// for the moving average.
///
/// `next = prev * ((interval - 1) * spacing + solvetime) / (interval * spacing)`,
/// interval chosen as `(N + 1) / 2` of the average's window for the same
/// center of mass.
pub fn weighted_target_ema(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let proof_of_stake = block.is_proof_of_stake();
    let bn_pow_limit = pow_limit_for(params, algo, proof_of_stake);
    let pow_limit_compact = target_to_bits(bn_pow_limit);
    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    let Some((prev, prev_prev)) = retarget_anchors(tip, algo, proof_of_stake) else {
        return pow_limit_compact; // first or second block of this kind
    };

    let mut actual_spacing = prev.block_time() - prev_prev.block_time();

    let mut bn_new = bits_to_target(prev.bits).target;
    let mut target_spacing = i64::from(params.pow_target_spacing) * 2;
    if !proof_of_stake {
        target_spacing *= ALGO_COUNT as i64 - 1;
    }
    let target_timespan = i64::from(params.pow_target_timespan);
    let interval = target_timespan / target_spacing;

    // Floor the solvetime so the numerator stays positive.
    if actual_spacing <= -((interval - 1) * target_spacing) {
        actual_spacing = -((interval - 1) * target_spacing) + 1;
    }

    let numerator = ((interval - 1) * target_spacing + actual_spacing) as u32;
    let denominator = (interval * target_spacing) as u32;

    let wide = Uint512::from_u256(&bn_new)
        .mul_u32(numerator)
        .div_u32(denominator);
    bn_new = wide.trim256().0;

    if bn_new > *bn_pow_limit {
        bn_new = bn_pow_limit.clone();
    }

    target_to_bits_rounded(&bn_new)
}

/// Simple moving average of past targets with DigiShield tempering.
///
/// Averages the last `timespan / spacing / 4` same-kind targets (skipping
/// limit-difficulty blocks), then scales by the tempered window timespan.
pub fn simple_moving_average_target(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let proof_of_stake = block.is_proof_of_stake();
    let bn_pow_limit = pow_limit_for(params, algo, proof_of_stake);
    let pow_limit_compact = target_to_bits(bn_pow_limit);

    let mut target_spacing = i64::from(params.pow_target_spacing) * 2;
    if !proof_of_stake {
        target_spacing *= ALGO_COUNT as i64 - 1;
    }

    let mut use_tempering = true; // tempered (DigiShield) rather than DGW
    const TEMPERING_FACTOR: i64 = 4;
    let mut past_blocks = i64::from(params.pow_target_timespan) / target_spacing;
    if use_tempering {
        // Average fewer blocks to respond faster; tempering restores the
        // stability of the longer window.
        past_blocks /= TEMPERING_FACTOR;
    }

    // 1 is a plain SMA; 2 would double-weight the newest target (DGW).
    const FIRST_WEIGHT_MULTIPLIER: u32 = 1;

    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    let Some(prev) = last_of_same(Some(tip), algo, proof_of_stake) else {
        return pow_limit_compact;
    };
    if prev.prev.is_none() {
        return pow_limit_compact; // first block
    }

    if i64::from(tip.height) < past_blocks + 2 {
        // Too little history for the average (the first two blocks sit at
        // the limit); bootstrap with the EMA.
        return weighted_target_ema(Some(tip), block, params);
    }

    let mut index: &BlockIndex = prev;
    let mut past_target_avg = Uint256::zero();
    let mut counted: i64 = 1;
    while counted <= past_blocks {
        if index.bits != pow_limit_compact || !params.pow_allow_min_difficulty_blocks {
            let mut target = bits_to_target(index.bits).target;
            if counted == 1 {
                target = target.wrapping_mul_u32(FIRST_WEIGHT_MULTIPLIER);
            }
            past_target_avg = past_target_avg
                .wrapping_add(&target.div_u32(past_blocks as u32 + FIRST_WEIGHT_MULTIPLIER - 1));
        } else {
            // Skipped a min-difficulty target; average one more block.
            counted -= 1;
        }

        let before = last_of_same(index.prev.as_deref(), algo, proof_of_stake);
        // Skipping the last index here would compute the timespan from one
        // timestamp fewer than the average used.
        match before {
            Some(p) if p.height != 0 => index = p,
            _ => break,
        }
        counted += 1;
    }

    if past_target_avg.is_zero() {
        past_target_avg = bn_pow_limit.clone();
    }
    let bn_new = past_target_avg;

    let mut actual_timespan = prev.block_time() - index.block_time();
    let mut target_timespan = past_blocks * target_spacing;
    // Skip tempering when the window ran fast, to respond sooner. This
    // makes the response asymmetric.
    if actual_timespan <= target_timespan / 2 {
        use_tempering = false;
    }

    if use_tempering {
        actual_timespan += (TEMPERING_FACTOR - 1) * target_timespan;
        target_timespan *= TEMPERING_FACTOR;
    }

    // Floor the timespan so the product cannot be zeroed by hostile
    // timestamps; unreachable under sequential-timestamp enforcement.
    if actual_timespan < 1 {
        actual_timespan = 1;
    }

    let wide = Uint512::from_u256(&bn_new)
        .mul_u32(actual_timespan as u32)
        .div_u32(target_timespan as u32);
    let mut bn_new = wide.trim256().0;

    if bn_new > *bn_pow_limit {
        bn_new = bn_pow_limit.clone();
    }

    target_to_bits_rounded(&bn_new)
}

/// Linearly weighted solve-time average. Regtest experiment.
pub fn weighted_moving_average_target(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let proof_of_stake = block.is_proof_of_stake();
    let bn_pow_limit = pow_limit_for(params, algo, proof_of_stake);
    let pow_limit_compact = target_to_bits(bn_pow_limit);

    let mut target_spacing = i64::from(params.pow_target_spacing) * 2;
    if !proof_of_stake {
        target_spacing *= ALGO_COUNT as i64 - 1;
    }

    // Weight growth per recency step: cubic and quadratic terms are off.
    const X_CUBED_MULTI: i64 = 0;
    const X_SQUARED_MULTI: i64 = 0;
    const X_MULTI: i64 = 1;
    let past_blocks = i64::from(params.pow_target_timespan) / target_spacing;

    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    let Some(prev) = last_of_same(Some(tip), algo, proof_of_stake) else {
        return pow_limit_compact;
    };
    if prev.prev.is_none() {
        return pow_limit_compact; // first block
    }

    if i64::from(tip.height) < past_blocks + 2 {
        return weighted_target_ema(Some(tip), block, params);
    }

    let mut index: &BlockIndex = prev;
    let mut past_target_avg = Uint256::zero();
    let mut sum_solvetimes_weighted: i64 = 0;
    let mut elements_averaged: i64 = 0;

    let mut countdown = past_blocks;
    while countdown >= 1 {
        let before = last_of_same(index.prev.as_deref(), algo, proof_of_stake);
        if index.bits != pow_limit_compact || !params.pow_allow_min_difficulty_blocks {
            let target = bits_to_target(index.bits).target;
            past_target_avg = past_target_avg.wrapping_add(&target.div_u32(past_blocks as u32));

            if let Some(before) = before {
                if before.height != 0 {
                    let weight = X_CUBED_MULTI * countdown * countdown * countdown
                        + X_SQUARED_MULTI * countdown * countdown
                        + X_MULTI * countdown;
                    sum_solvetimes_weighted +=
                        (index.block_time() - before.block_time()) * weight;
                    elements_averaged += weight;
                }
            }
        } else {
            // Skipped a min-difficulty target; average one more block.
            countdown += 1;
        }

        match before {
            Some(p) if p.height != 0 => index = p,
            _ => break,
        }
        countdown -= 1;
    }

    if past_target_avg.is_zero() {
        past_target_avg = bn_pow_limit.clone();
    }
    let bn_new = past_target_avg;

    let mut actual_timespan = sum_solvetimes_weighted;
    let target_timespan = (past_blocks * target_spacing * elements_averaged).max(1);

    if actual_timespan < 1 {
        actual_timespan = 1;
    }

    let wide = Uint512::from_u256(&bn_new)
        .mul_u32(actual_timespan as u32)
        .div_u32(target_timespan as u32);
    let mut bn_new = wide.trim256().0;

    if bn_new > *bn_pow_limit {
        bn_new = bn_pow_limit.clone();
    }

    target_to_bits_rounded(&bn_new)
}

/// Absolutely scheduled exponentially rising targets. Regtest experiment.
///
/// The target scales by `2^((solvetime - spacing) / timespan)` per
/// same-kind step; the fractional power of two is approximated by a cubic
/// in the remainder.
pub fn asert_target(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let proof_of_stake = block.is_proof_of_stake();
    let bn_pow_limit = pow_limit_for(params, algo, proof_of_stake);
    let pow_limit_compact = target_to_bits(bn_pow_limit);
    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    let Some((prev, prev_prev)) = retarget_anchors(tip, algo, proof_of_stake) else {
        return pow_limit_compact; // first or second block of this kind
    };

    let mut target_spacing = i64::from(params.pow_target_spacing) * 2;
    if !proof_of_stake {
        target_spacing *= ALGO_COUNT as i64 - 1;
    }
    let timespan = i64::from(params.pow_target_timespan);

    let solvetime = prev.block_time() - prev_prev.block_time();
    let exponent = solvetime - target_spacing;
    let shifts = exponent.div_euclid(timespan);
    let remainder = exponent.rem_euclid(timespan);

    let mut bn_new = bits_to_target(prev.bits).target;
    if shifts >= 0 {
        bn_new = bn_new.wrapping_shl(shifts.min(256) as u32);
    } else {
        bn_new = bn_new.shr((-shifts).min(256) as u32);
    }

    // 2^(x/b) ~= (4x^3 + 11x^2 b + 35x b^2 + 50 b^3) / (50 b^3) on [0, b):
    // exact at both ends, within ~0.2% between.
    let x = remainder as u128;
    let b = timespan as u128;
    let numerator = 4 * x * x * x + 11 * x * x * b + 35 * x * b * b + 50 * b * b * b;
    let denominator = 50 * b * b * b;

    let wide = mul_wide(&bn_new, &Uint256::from_u64(numerator as u64))
        .div_u256(&Uint256::from_u64(denominator as u64));
    bn_new = wide.trim256().0;

    if bn_new > *bn_pow_limit {
        bn_new = bn_pow_limit.clone();
    }

    target_to_bits_rounded(&bn_new)
}

/// Schedule-deviation controller. Regtest experiment.
///
/// Compares the recent window against its scheduled duration; when the
/// chain runs 100 or more block-times ahead of or behind schedule, the
/// spacing is bumped 10% toward correction and the per-block adjustment
/// percentage is raised tenfold.
pub fn simple_target_frontier(
    tip: Option<&BlockIndex>,
    block: &BlockHeader,
    params: &ConsensusParams,
) -> u32 {
    let algo = block.algo();
    let proof_of_stake = block.is_proof_of_stake();
    let bn_pow_limit = pow_limit_for(params, algo, proof_of_stake);
    let pow_limit_compact = target_to_bits(bn_pow_limit);
    let Some(tip) = tip else {
        return pow_limit_compact; // genesis block
    };
    let Some((prev, prev_prev)) = retarget_anchors(tip, algo, proof_of_stake) else {
        return pow_limit_compact; // first or second block of this kind
    };

    let mut target_spacing = i64::from(params.pow_target_spacing) * 2;
    if !proof_of_stake {
        target_spacing *= ALGO_COUNT as i64 - 1;
    }
    let timespan = i64::from(params.pow_target_timespan);

    // Measure schedule deviation over the averaging window.
    let window = timespan / target_spacing;
    let mut index: &BlockIndex = prev;
    let mut visited: i64 = 0;
    while visited < window {
        match last_of_same(index.prev.as_deref(), algo, proof_of_stake) {
            Some(p) if p.height != 0 => {
                index = p;
                visited += 1;
            }
            _ => break,
        }
    }
    let actual_window = prev.block_time() - index.block_time();
    let deviation_blocks = (actual_window - visited * target_spacing) / target_spacing;

    let mut adjust_percent: i64 = 1;
    if deviation_blocks >= 100 {
        // Behind schedule: aim faster, correct harder.
        target_spacing = target_spacing * 9 / 10;
        adjust_percent *= 10;
    } else if deviation_blocks <= -100 {
        target_spacing = target_spacing * 11 / 10;
        adjust_percent *= 10;
    }

    let solvetime = prev.block_time() - prev_prev.block_time();
    let percent = if solvetime > target_spacing {
        100 + adjust_percent
    } else if solvetime < target_spacing {
        100 - adjust_percent
    } else {
        100
    };

    let mut bn_new = bits_to_target(prev.bits).target;
    let wide = Uint512::from_u256(&bn_new)
        .mul_u32(percent as u32)
        .div_u32(100);
    bn_new = wide.trim256().0;

    if bn_new > *bn_pow_limit {
        bn_new = bn_pow_limit.clone();
    }

    target_to_bits_rounded(&bn_new)
}

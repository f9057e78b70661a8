// Consensus-critical. Changes require spec update + tests.
//! Fixed-width unsigned target arithmetic and the compact encoding.
//!
//! Targets are 256-bit unsigned integers. Intermediate products in the
//! retargeting formulas are taken in 512 bits and reduced with [`Uint512::trim256`],
//! except where a historical regime demands the silently-truncating 256-bit
//! product ([`Uint256::wrapping_mul_u32`]). The widths, the truncation on
//! overflow, and both compact rounding modes are protocol, not implementation:
//! a single differing bit forks the chain.
//!
//! The compact (`bits`) form encodes a target as `mantissa * 256^(exp-3)`
//! with a sign bit and a 23-bit mantissa. The truncating encoder drops the
//! low bytes; the rounded encoder rounds half-to-even at the truncation
//! boundary. Which encoder applies is selected by block height upstream.

use crate::error::ConsensusError;
use num_bigint::BigUint;
use num_traits::{One, Zero};

fn mask(bits: u32) -> BigUint {
    (BigUint::one() << bits) - BigUint::one()
}

/// 256-bit unsigned integer.
///
/// Internally arbitrary precision with every operation masked back to 256
/// bits, so overflow behavior is explicit at each call site.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Uint256(BigUint);

impl Uint256 {
    /// Zero.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Construct from a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self(BigUint::from(value))
    }

    /// Construct from a big-endian hex literal (up to 64 digits).
    pub fn from_be_hex(s: &str) -> Result<Self, ConsensusError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let n = BigUint::parse_bytes(s.as_bytes(), 16).ok_or(ConsensusError::InvalidHex)?;
        if n.bits() > 256 {
            return Err(ConsensusError::InvalidHex);
        }
        Ok(Self(n))
    }

    /// Interpret 32 little-endian bytes (e.g. a raw hash) as an integer.
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        Self(BigUint::from_bytes_le(bytes))
    }

    /// Little-endian bytes, zero-padded to 32.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = self.0.to_bytes_le();
        out[..bytes.len()].copy_from_slice(&bytes);
        out
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    /// True if zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Low 64 bits.
    pub fn low_u64(&self) -> u64 {
        self.0.iter_u64_digits().next().unwrap_or(0)
    }

    /// Logical right shift.
    pub fn shr(&self, shift: u32) -> Self {
        Self(&self.0 >> shift)
    }

    /// Left shift, discarding bits shifted past 2^256.
    pub fn wrapping_shl(&self, shift: u32) -> Self {
        Self((&self.0 << shift) & mask(256))
    }

    /// Addition modulo 2^256.
    pub fn wrapping_add(&self, other: &Self) -> Self {
        Self((&self.0 + &other.0) & mask(256))
    }

    /// Multiplication by a word, silently truncated to 256 bits.
    ///
    /// This is the historical overflow behavior relied on by the legacy
    /// Quark/Scrypt² retargeting regime.
    pub fn wrapping_mul_u32(&self, m: u32) -> Self {
        Self((&self.0 * m) & mask(256))
    }

    /// Truncating division by a word.
    pub fn div_u32(&self, d: u32) -> Self {
        Self(&self.0 / d)
    }

    pub(crate) fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub(crate) fn from_biguint_wrapped(n: BigUint) -> Self {
        Self(n & mask(256))
    }
}

impl core::fmt::Display for Uint256 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:0>64}", self.0.to_str_radix(16))
    }
}

/// 512-bit unsigned integer: the accumulator for retargeting products.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Uint512(BigUint);

impl Uint512 {
    /// Widen a 256-bit value.
    pub fn from_u256(value: &Uint256) -> Self {
        Self(value.0.clone())
    }

    /// Multiplication by a word, truncated to 512 bits.
    pub fn mul_u32(&self, m: u32) -> Self {
        Self((&self.0 * m) & mask(512))
    }

    /// Truncating division by a word.
    pub fn div_u32(&self, d: u32) -> Self {
        Self(&self.0 / d)
    }

    /// Truncating division by a 256-bit value.
    pub fn div_u256(&self, d: &Uint256) -> Self {
        Self(&self.0 / &d.0)
    }

    /// Low 256 bits, plus whether the value fit (high half was zero).
    pub fn trim256(&self) -> (Uint256, bool) {
        let fits = (&self.0 >> 256u32).is_zero();
        (Uint256(&self.0 & mask(256)), fits)
    }
}

/// Full-width 256x256 -> 512 multiplication.
pub fn mul_wide(a: &Uint256, b: &Uint256) -> Uint512 {
    Uint512(&a.0 * &b.0)
}

/// A compact target decoded into its value and range flags.
#[derive(Clone, Debug)]
pub struct DecodedBits {
    /// The 256-bit threshold.
    pub target: Uint256,
    /// Sign bit was set (with a non-zero mantissa).
    pub negative: bool,
    /// Encoding does not fit 256 bits.
    pub overflow: bool,
}

/// Decode compact `bits` into a target and its flags.
///
/// The exponent/mantissa split, the shift-by-bytes semantics, and the exact
/// overflow thresholds are consensus.
pub fn bits_to_target(bits: u32) -> DecodedBits {
    let size = bits >> 24;
    let word = bits & 0x007f_ffff;
    let target = if size <= 3 {
        Uint256::from_u64(u64::from(word >> (8 * (3 - size))))
    } else {
        Uint256::from_biguint_wrapped(BigUint::from(word) << (8 * (size - 3)))
    };
    let negative = word != 0 && (bits & 0x0080_0000) != 0;
    let overflow =
        word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
    DecodedBits {
        target,
        negative,
        overflow,
    }
}

/// Encode a target in compact form, truncating the dropped low bytes.
pub fn target_to_bits(target: &Uint256) -> u32 {
    let mut size = (target.bits() + 7) / 8;
    let mut compact: u64 = if size <= 3 {
        target.low_u64() << (8 * (3 - size))
    } else {
        target.shr((8 * (size - 3)) as u32).low_u64()
    };
    // Keep the sign bit clear: spill the top byte into the exponent.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }
    (compact as u32) | ((size as u32) << 24)
}

/// Encode a target in compact form, rounding half-to-even at the last
/// retained bit.
pub fn target_to_bits_rounded(target: &Uint256) -> u32 {
    let mut size = (target.bits() + 7) / 8;
    if size <= 3 {
        // Nothing is dropped; identical to the truncating form.
        return target_to_bits(target);
    }
    let shift = (8 * (size - 3)) as u32;
    let mut word = target.shr(shift).low_u64();
    let remainder = target.as_biguint() & mask(shift);
    let half = BigUint::one() << (shift - 1);
    if remainder > half || (remainder == half && word & 1 == 1) {
        word += 1;
    }
    // Rounding may carry out of the mantissa, and the sign bit must stay clear.
    if word >= 0x0100_0000 {
        word >>= 8;
        size += 1;
    }
    if word & 0x0080_0000 != 0 {
        word >>= 8;
        size += 1;
    }
    (word as u32) | ((size as u32) << 24)
}

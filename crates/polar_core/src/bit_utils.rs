//! Bit manipulation utilities for polar code index permutations.
//!
//! Provides the power-of-two test used by every validation path, integer bit
//! reversal with an explicit width, the bit-reversal permutation table and
//! MSB-first packing of up to eight bits into a byte.

use crate::PolarError;
use alloc::vec::Vec;
use polar_common::consts::MAX_BLOCK_POWER;

/// Returns true iff `n` is a positive integer with exactly one bit set.
///
/// Accepts any integer type. Negative values fail the conversion to `u64` and
/// are therefore rejected along with zero.
#[inline]
pub fn is_power_of_two<T: TryInto<u64>>(n: T) -> bool {
    n.try_into().is_ok_and(|v: u64| v.is_power_of_two())
}

/// Returns `log2(n)` for a valid block length.
///
/// # Errors
///
/// `NotPowerOfTwo` if `n` is zero or not a power of two, `BlockTooLarge` if
/// the exponent exceeds `MAX_BLOCK_POWER`.
pub fn block_power(n: usize) -> Result<u32, PolarError> {
    if !is_power_of_two(n) {
        return Err(PolarError::NotPowerOfTwo(n));
    }
    let power = n.trailing_zeros();
    if power > MAX_BLOCK_POWER {
        return Err(PolarError::BlockTooLarge(n));
    }
    Ok(power)
}

/// Reverses the `width`-bit binary representation of `value`.
///
/// Bits of `value` at or above `width` are ignored. For odd widths the middle
/// bit stays in place. Applying the function twice with the same width is the
/// identity on `[0, 2^width)`.
#[inline]
pub fn bit_reverse(value: usize, width: u32) -> usize {
    if width == 0 {
        return 0;
    }
    value.reverse_bits() >> (usize::BITS - width)
}

/// Applies `bit_reverse` element-wise.
///
/// For `indices = 0..N` and `width = log2(N)` the result is a permutation of
/// `0..N`.
pub fn bit_reverse_vector(indices: &[usize], width: u32) -> Vec<usize> {
    indices.iter().map(|&i| bit_reverse(i, width)).collect()
}

/// Builds the bit-reversal permutation table for blocks of `2^power` bits.
pub fn bit_reverse_table(power: u32) -> Vec<usize> {
    (0..1usize << power).map(|i| bit_reverse(i, power)).collect()
}

/// Packs up to eight bits into a byte, most significant bit first.
///
/// A slice of `n` bits fills the `n` least significant bits, with `bits[0]`
/// in bit `n - 1`, so `unpack_byte(pack_bits(bits)?, bits.len())` gives the
/// slice back.
///
/// # Errors
///
/// `InvalidBitCount` if more than eight bits are given, `InvalidBit` if any
/// entry is not 0 or 1.
pub fn pack_bits(bits: &[u8]) -> Result<u8, PolarError> {
    if bits.len() > 8 {
        return Err(PolarError::InvalidBitCount {
            count: bits.len(),
            max: 8,
        });
    }
    let mut byte = 0u8;
    for &bit in bits {
        if bit > 1 {
            return Err(PolarError::InvalidBit(bit));
        }
        byte = (byte << 1) | bit;
    }
    Ok(byte)
}

/// Unpacks the `n_active` least significant bits of `byte`, MSB first.
///
/// # Errors
///
/// `InvalidBitCount` if `n_active` exceeds eight.
pub fn unpack_byte(byte: u8, n_active: usize) -> Result<Vec<u8>, PolarError> {
    if n_active > 8 {
        return Err(PolarError::InvalidBitCount {
            count: n_active,
            max: 8,
        });
    }
    Ok((0..n_active)
        .rev()
        .map(|shift| (byte >> shift) & 1)
        .collect())
}

/// Checks that every entry of `bits` is 0 or 1.
pub(crate) fn check_bits(bits: &[u8]) -> Result<(), PolarError> {
    match bits.iter().find(|&&b| b > 1) {
        Some(&b) => Err(PolarError::InvalidBit(b)),
        None => Ok(()),
    }
}

//! Channel polarization for the binary erasure channel.
//!
//! Repeatedly combining two copies of an erasure channel yields a worse and a
//! better synthetic channel, both again erasure channels. After `log2(N)`
//! doubling steps each of the N synthetic channels has a closed-form capacity.
//! The resulting vectors are indexed in synthesis order, the same index space
//! as the frozen-bit positions.

use crate::PolarError;
use crate::bit_utils::block_power;
use alloc::vec;
use alloc::vec::Vec;

/// Computes the capacities of the N synthetic channels of an erasure channel.
///
/// Starts from `[1 - eta]` and doubles the array `log2(N)` times: the child
/// at `2i` receives `v^2` (worse channel) and the child at `2i + 1` receives
/// `2v - v^2` (better channel), where `v` is the parent value at `i`. Larger
/// values are more reliable.
///
/// # Arguments
///
/// * `eta` - Erasure probability of the underlying channel, in `[0, 1]`
/// * `block_size` - Number of synthetic channels N, a power of two
///
/// # Returns
///
/// N capacities in `[0, 1]`, or a configuration error for invalid inputs.
pub fn bec_capacities(eta: f64, block_size: usize) -> Result<Vec<f64>, PolarError> {
    check_eta(eta)?;
    let power = block_power(block_size)?;
    Ok(polarize(1.0 - eta, power, |v| (v * v, 2.0 * v - v * v)))
}

/// Computes the Bhattacharyya parameters of the N synthetic erasure channels.
///
/// The error-polarity twin of `bec_capacities`: starts from `[eta]` and the
/// child at `2i` receives `2z - z^2` while the child at `2i + 1` receives
/// `z^2`. Larger values are less reliable. Each entry equals one minus the
/// corresponding capacity up to rounding.
pub fn bec_z_parameters(eta: f64, block_size: usize) -> Result<Vec<f64>, PolarError> {
    check_eta(eta)?;
    let power = block_power(block_size)?;
    Ok(polarize(eta, power, |z| (2.0 * z - z * z, z * z)))
}

fn check_eta(eta: f64) -> Result<(), PolarError> {
    if (0.0..=1.0).contains(&eta) {
        Ok(())
    } else {
        Err(PolarError::InvalidErasureProbability(eta))
    }
}

/// Runs the doubling recursion from a single seed value.
///
/// `split` maps a parent value to its (even child, odd child) pair.
fn polarize(seed: f64, power: u32, split: impl Fn(f64) -> (f64, f64)) -> Vec<f64> {
    let mut values = vec![seed];
    for _ in 0..power {
        let mut next = Vec::with_capacity(values.len() * 2);
        for &v in &values {
            let (even, odd) = split(v);
            next.push(even);
            next.push(odd);
        }
        values = next;
    }
    values
}

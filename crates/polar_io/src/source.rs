//! External z-parameter computation for the AWGN channel model.
//!
//! The accurate AWGN construction is an expensive numerical routine that this
//! crate treats as an opaque collaborator. The cache only requires that the
//! routine be deterministic for fixed inputs and return one value in `[0, 1]`
//! per synthetic channel, larger meaning less reliable.

use crate::error::ComputeError;
use polar_core::bec::bec_z_parameters;

/// Computes per-channel Bhattacharyya parameters for a noisy channel.
///
/// Implementations must be deterministic: the cache persists the result under
/// a key derived from the arguments alone and never recomputes a valid entry.
pub trait ZParameterSource: Send + Sync {
    /// Returns `block_size` z-parameters in synthesis order.
    ///
    /// # Arguments
    ///
    /// * `block_size` - Number of synthetic channels N, a power of two
    /// * `design_snr_db` - Design SNR in dB, above the model minimum
    /// * `resolution` - Positive construction fidelity knob
    fn compute(
        &self,
        block_size: usize,
        design_snr_db: f64,
        resolution: u32,
    ) -> Result<Vec<f64>, ComputeError>;
}

impl<F> ZParameterSource for F
where
    F: Fn(usize, f64, u32) -> Result<Vec<f64>, ComputeError> + Send + Sync,
{
    fn compute(
        &self,
        block_size: usize,
        design_snr_db: f64,
        resolution: u32,
    ) -> Result<Vec<f64>, ComputeError> {
        self(block_size, design_snr_db, resolution)
    }
}

/// Converts a design SNR in dB to the erasure probability of the matching BEC.
///
/// Uses `eta = exp(-10^(snr / 10))`, the Bhattacharyya parameter of the
/// binary-input AWGN channel at that SNR.
pub fn design_snr_to_bec_eta(design_snr_db: f64) -> f64 {
    let snr = 10f64.powf(design_snr_db / 10.0);
    (-snr).exp()
}

/// Bhattacharyya-bound estimator of AWGN z-parameters.
///
/// Approximates the AWGN channel by the erasure channel with the same
/// Bhattacharyya parameter and polarizes it in closed form. The resolution
/// argument does not change the estimate; it only keys the cache entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct BhattacharyyaBound;

impl ZParameterSource for BhattacharyyaBound {
    fn compute(
        &self,
        block_size: usize,
        design_snr_db: f64,
        _resolution: u32,
    ) -> Result<Vec<f64>, ComputeError> {
        let eta = design_snr_to_bec_eta(design_snr_db);
        Ok(bec_z_parameters(eta, block_size)?)
    }
}

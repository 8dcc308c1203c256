//! Construction facade for polar codes.
//!
//! Turns a construction request (channel model, N, K, design SNR, resolution)
//! into the frozen-bit bundle that encoders and decoders are built from. All
//! parameters are validated before any reliability computation runs.

use crate::cache::{CacheKey, ParameterCache, resolve_resolution};
use crate::error::ConstructionError;
use crate::source::design_snr_to_bec_eta;
use polar_common::channel::ChannelKind;
use polar_common::consts::DEFAULT_RESOLUTION;
use polar_core::PolarError;
use polar_core::bec::bec_capacities;
use polar_core::code::PolarCode;
use polar_core::selector::{Polarity, select_frozen};
use tracing::info;

/// Whether an AWGN request may be served by the erasure-channel approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelPolicy {
    /// Always use the requested channel model.
    #[default]
    Requested,

    /// Serve AWGN requests with the erasure-channel recursion at the
    /// SNR-derived erasure probability instead of the cached z-parameters.
    /// Skips the external computation and the cache entirely.
    ErasureApproximation,
}

/// Parameters of one construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructionRequest {
    pub channel: ChannelKind,
    pub block_size: usize,
    pub num_info_bits: usize,
    pub design_snr_db: f64,
    /// Non-positive values select `DEFAULT_RESOLUTION`.
    pub resolution: i64,
    pub policy: ModelPolicy,
}

impl ConstructionRequest {
    pub fn new(
        channel: ChannelKind,
        block_size: usize,
        num_info_bits: usize,
        design_snr_db: f64,
    ) -> Self {
        Self {
            channel,
            block_size,
            num_info_bits,
            design_snr_db,
            resolution: DEFAULT_RESOLUTION as i64,
            policy: ModelPolicy::Requested,
        }
    }

    pub fn with_resolution(mut self, resolution: i64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_policy(mut self, policy: ModelPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A channel model resolved with exactly the data its construction needs.
#[derive(Debug)]
pub enum ChannelModel<'a> {
    /// Erasure channel polarized in closed form.
    Erasure { eta: f64 },

    /// AWGN channel whose z-parameters come from the cache.
    Awgn {
        key: CacheKey,
        cache: &'a ParameterCache,
    },
}

impl ChannelModel<'_> {
    /// Computes the reliability vector and reports its polarity.
    pub fn reliabilities(
        &self,
        block_size: usize,
    ) -> Result<(Vec<f64>, Polarity), ConstructionError> {
        match self {
            ChannelModel::Erasure { eta } => {
                Ok((bec_capacities(*eta, block_size)?, Polarity::Capacity))
            }
            ChannelModel::Awgn { key, cache } => Ok((cache.get(key)?, Polarity::ErrorBound)),
        }
    }
}

/// Frozen-bit positions and values with the parameters that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenBitInfo {
    /// Ascending frozen positions.
    pub positions: Vec<usize>,
    /// Frozen values, all zero.
    pub values: Vec<u8>,
    pub block_size: usize,
    pub num_info_bits: usize,
    pub num_frozen_bits: usize,
    pub design_snr_db: f64,
    pub channel: ChannelKind,
    pub resolution: u32,
}

impl FrozenBitInfo {
    /// Builds the shared transform core for this frozen set.
    pub fn to_code(&self) -> Result<PolarCode, PolarError> {
        PolarCode::new(
            self.block_size,
            self.num_info_bits,
            self.positions.clone(),
            Some(self.values.clone()),
        )
    }
}

/// Validates a request and resolves it into a channel model.
///
/// AWGN requests resolve to the erasure model when the policy allows it.
pub fn resolve<'a>(
    request: &ConstructionRequest,
    cache: &'a ParameterCache,
) -> Result<ChannelModel<'a>, ConstructionError> {
    let key = CacheKey::new(request.block_size, request.design_snr_db, request.resolution)?;
    if request.num_info_bits == 0 || request.num_info_bits >= request.block_size {
        return Err(PolarError::InvalidInfoLength {
            block_size: request.block_size,
            num_info_bits: request.num_info_bits,
        }
        .into());
    }

    let eta = design_snr_to_bec_eta(request.design_snr_db);
    match (request.channel, request.policy) {
        (ChannelKind::Bec, _) => Ok(ChannelModel::Erasure { eta }),
        (ChannelKind::Awgn, ModelPolicy::ErasureApproximation) => {
            info!(
                design_snr_db = request.design_snr_db,
                eta, "using erasure approximation for AWGN construction"
            );
            Ok(ChannelModel::Erasure { eta })
        }
        (ChannelKind::Awgn, ModelPolicy::Requested) => Ok(ChannelModel::Awgn { key, cache }),
    }
}

/// Constructs the frozen-bit set for a request.
///
/// # Arguments
///
/// * `request` - Channel model and code parameters
/// * `cache` - Z-parameter cache consulted for AWGN constructions
///
/// # Returns
///
/// The `N - K` least reliable positions in ascending order with all-zero
/// values, or a configuration, I/O or computation error.
pub fn build(
    request: &ConstructionRequest,
    cache: &ParameterCache,
) -> Result<FrozenBitInfo, ConstructionError> {
    let model = resolve(request, cache)?;
    let num_frozen_bits = request.block_size - request.num_info_bits;

    let (reliabilities, polarity) = model.reliabilities(request.block_size)?;
    let positions = select_frozen(&reliabilities, num_frozen_bits, polarity)?;

    info!(
        channel = %request.channel,
        block_size = request.block_size,
        num_info_bits = request.num_info_bits,
        design_snr_db = request.design_snr_db,
        "polar code constructed"
    );

    Ok(FrozenBitInfo {
        positions,
        values: vec![0; num_frozen_bits],
        block_size: request.block_size,
        num_info_bits: request.num_info_bits,
        num_frozen_bits,
        design_snr_db: request.design_snr_db,
        channel: request.channel,
        resolution: resolve_resolution(request.resolution),
    })
}

/// Frozen positions of the erasure-channel construction at a design SNR.
///
/// Needs no cache. Equivalent to `build` with `ChannelKind::Bec`.
pub fn bec_frozen_positions(
    block_size: usize,
    num_info_bits: usize,
    design_snr_db: f64,
) -> Result<Vec<usize>, PolarError> {
    CacheKey::new(block_size, design_snr_db, DEFAULT_RESOLUTION as i64)?;
    if num_info_bits == 0 || num_info_bits >= block_size {
        return Err(PolarError::InvalidInfoLength {
            block_size,
            num_info_bits,
        });
    }
    let caps = bec_capacities(design_snr_to_bec_eta(design_snr_db), block_size)?;
    select_frozen(&caps, block_size - num_info_bits, Polarity::Capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BhattacharyyaBound, ZParameterSource};
    use std::sync::Arc;

    fn unused_cache() -> ParameterCache {
        ParameterCache::new(
            "/nonexistent/polar-cache",
            Arc::new(|_: usize, _: f64, _: u32| -> Result<Vec<f64>, crate::error::ComputeError> {
                Err("must not be called".into())
            }),
        )
    }

    #[test]
    fn bec_construction_needs_no_cache_access() {
        let request = ConstructionRequest::new(ChannelKind::Bec, 64, 32, 0.0);
        let info = build(&request, &unused_cache()).unwrap();
        assert_eq!(info.positions.len(), 32);
        assert_eq!(info.num_frozen_bits, 32);
        assert_eq!(info.values, vec![0; 32]);
        assert!(info.positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(info.positions, bec_frozen_positions(64, 32, 0.0).unwrap());
    }

    #[test]
    fn erasure_approximation_bypasses_the_cache() {
        let request = ConstructionRequest::new(ChannelKind::Awgn, 32, 16, 1.0)
            .with_policy(ModelPolicy::ErasureApproximation);
        let info = build(&request, &unused_cache()).unwrap();
        assert_eq!(info.channel, ChannelKind::Awgn);
        assert_eq!(info.positions, bec_frozen_positions(32, 16, 1.0).unwrap());
    }

    #[test]
    fn frozen_set_agrees_with_bound_source_polarity() {
        let z = BhattacharyyaBound.compute(64, 0.5, 2).unwrap();
        let from_z = select_frozen(&z, 40, Polarity::ErrorBound).unwrap();
        assert_eq!(from_z, bec_frozen_positions(64, 24, 0.5).unwrap());
    }

    #[test]
    fn smallest_code_freezes_the_worse_channel() {
        assert_eq!(bec_frozen_positions(2, 1, 0.0).unwrap(), vec![0]);
    }

    #[test]
    fn validation_happens_before_computation() {
        let cache = unused_cache();
        let bad_n = ConstructionRequest::new(ChannelKind::Awgn, 48, 16, 0.0);
        assert!(matches!(
            build(&bad_n, &cache),
            Err(ConstructionError::Config(PolarError::NotPowerOfTwo(48)))
        ));
        let bad_snr = ConstructionRequest::new(ChannelKind::Awgn, 64, 16, -2.0);
        assert!(matches!(
            build(&bad_snr, &cache),
            Err(ConstructionError::Config(PolarError::DesignSnrTooLow(_)))
        ));
        let infinite_snr = ConstructionRequest::new(ChannelKind::Bec, 64, 16, f64::INFINITY);
        assert!(matches!(
            build(&infinite_snr, &cache),
            Err(ConstructionError::Config(PolarError::NonFiniteDesignSnr(_)))
        ));
        let bad_k = ConstructionRequest::new(ChannelKind::Bec, 64, 64, 0.0);
        assert!(matches!(
            build(&bad_k, &cache),
            Err(ConstructionError::Config(PolarError::InvalidInfoLength { .. }))
        ));
    }

    #[test]
    fn resolution_default_is_reported() {
        let request = ConstructionRequest::new(ChannelKind::Bec, 16, 8, 0.0).with_resolution(0);
        let info = build(&request, &unused_cache()).unwrap();
        assert_eq!(info.resolution, DEFAULT_RESOLUTION);
        let code = info.to_code().unwrap();
        assert_eq!(code.num_info_bits(), 8);
    }
}

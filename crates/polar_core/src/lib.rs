//! Core polar code construction algorithms and data structures.
//!
//! This crate provides the side-effect-free pieces of polar code construction:
//! bit utilities, erasure-channel polarization, reliability-based frozen-set
//! selection and the shared transform core that encoders and decoders hold
//! for the lifetime of a code configuration. All modules are `no_std` with
//! `alloc` so they can run in the same environments as the encoders built on
//! top of them.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use core::fmt;

/// Bit manipulation utilities for index permutation and byte packing.
///
/// Provides the power-of-two test, integer bit reversal and the bit-reversal
/// permutation table, plus MSB-first packing of up to eight bits into a byte.
/// Used to align the recursive construction order with the bit ordering of
/// production encoders.
pub mod bit_utils;

/// Channel polarization for the binary erasure channel.
///
/// Computes the capacities (or Bhattacharyya parameters) of the N synthetic
/// bit channels obtained by recursively combining copies of an erasure
/// channel. The recursion is closed-form and cheap, so results are recomputed
/// on demand instead of cached.
pub mod bec;

/// Reliability-based frozen-set selection.
///
/// Picks the least reliable synthetic channels from a reliability vector,
/// in either capacity polarity (lowest first) or error polarity (highest
/// first), with deterministic tie-breaking. Also builds frozen-bit masks.
pub mod selector;

/// Shared transform and validation core for polar encoders and decoders.
///
/// Validates a code configuration once, derives the information-bit index set
/// and bit-reversal table, and implements frozen-bit insertion, information
/// extraction and the XOR-butterfly encoding transform. Instances are
/// immutable and safe for concurrent use.
pub mod code;

/// Error types returned by polar construction and transform operations.
///
/// Every variant except `LengthMismatch` is a configuration error raised
/// synchronously while a code or construction request is validated.
/// `LengthMismatch` reports a per-call vector whose length does not match the
/// configured code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolarError {
    /// The block length is not a positive power of two.
    NotPowerOfTwo(usize),

    /// The block length exponent exceeds the supported maximum.
    BlockTooLarge(usize),

    /// The information length is not strictly between zero and the block length.
    InvalidInfoLength { block_size: usize, num_info_bits: usize },

    /// The number of frozen positions differs from `N - K`.
    FrozenCountMismatch { expected: usize, actual: usize },

    /// A frozen position lies outside `[0, N)`.
    PositionOutOfRange { position: usize, block_size: usize },

    /// A frozen position appears more than once (strict validation only).
    DuplicatePosition(usize),

    /// The number of frozen values differs from the number of frozen positions.
    FrozenValuesLengthMismatch { expected: usize, actual: usize },

    /// A bit value is outside `{0, 1}`.
    InvalidBit(u8),

    /// A bit count is outside the range accepted by the operation.
    InvalidBitCount { count: usize, max: usize },

    /// The erasure probability lies outside `[0, 1]` or is not finite.
    InvalidErasureProbability(f64),

    /// The design SNR does not exceed the model minimum.
    DesignSnrTooLow(f64),

    /// The design SNR is NaN or infinite.
    NonFiniteDesignSnr(f64),

    /// More frozen indices were requested than reliabilities are available.
    SelectionTooLarge { requested: usize, available: usize },

    /// A per-call vector length does not match the configured code.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for PolarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PolarError::NotPowerOfTwo(n) => {
                write!(f, "block length {} is not a power of two", n)
            }
            PolarError::BlockTooLarge(n) => {
                write!(f, "block length {} exceeds the supported maximum", n)
            }
            PolarError::InvalidInfoLength {
                block_size,
                num_info_bits,
            } => write!(
                f,
                "information length {} must satisfy 0 < K < N = {}",
                num_info_bits, block_size
            ),
            PolarError::FrozenCountMismatch { expected, actual } => write!(
                f,
                "expected {} frozen bit positions (N - K), got {}",
                expected, actual
            ),
            PolarError::PositionOutOfRange {
                position,
                block_size,
            } => write!(
                f,
                "frozen bit position {} is outside [0, {})",
                position, block_size
            ),
            PolarError::DuplicatePosition(p) => {
                write!(f, "frozen bit position {} appears more than once", p)
            }
            PolarError::FrozenValuesLengthMismatch { expected, actual } => write!(
                f,
                "expected {} frozen bit values, got {}",
                expected, actual
            ),
            PolarError::InvalidBit(b) => write!(f, "bit value {} is not 0 or 1", b),
            PolarError::InvalidBitCount { count, max } => {
                write!(f, "bit count {} is outside [0, {}]", count, max)
            }
            PolarError::InvalidErasureProbability(eta) => {
                write!(f, "erasure probability {} is outside [0, 1]", eta)
            }
            PolarError::DesignSnrTooLow(snr) => write!(
                f,
                "design SNR {} dB must be greater than {} dB",
                snr,
                polar_common::consts::MIN_DESIGN_SNR_DB
            ),
            PolarError::NonFiniteDesignSnr(snr) => {
                write!(f, "design SNR {} dB is not a finite value", snr)
            }
            PolarError::SelectionTooLarge {
                requested,
                available,
            } => write!(
                f,
                "cannot select {} frozen indices from {} channels",
                requested, available
            ),
            PolarError::LengthMismatch { expected, actual } => {
                write!(f, "expected a vector of length {}, got {}", expected, actual)
            }
        }
    }
}

impl core::error::Error for PolarError {}

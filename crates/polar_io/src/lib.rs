//! I/O and construction utilities for polar codes.
//!
//! Provides the persistent cache of z-parameter vectors for the AWGN channel
//! model, the seam to the external z-parameter computation, the construction
//! facade that turns a construction request into a frozen-bit set, and
//! helpers for reading and writing packed bit files of fixed-size frames.

/// Construction facade combining channel models, cache and selector.
///
/// Resolves a construction request into a channel model, obtains its
/// reliability vector (erasure recursion or cached AWGN z-parameters), and
/// selects the frozen positions. The result can be turned into a
/// `polar_core::code::PolarCode` directly.
pub mod construct;

/// Persistent on-disk memoization of z-parameter vectors.
///
/// Maps each (block length, design SNR, resolution) key to one text file.
/// Missing or corrupted entries are recomputed and atomically replaced.
pub mod cache;

/// Error types for construction, cache access and external computation.
pub mod error;

/// File loading utilities for packed bit streams.
///
/// Reads and writes binary files holding fixed-size frames of bits, packed
/// least significant bit first with each frame padded to a whole byte.
pub mod loader;

/// Seam to the external z-parameter computation for the AWGN model.
///
/// Defines the `ZParameterSource` trait the cache calls on a miss, and a
/// deterministic Bhattacharyya-bound estimator usable as a default source.
pub mod source;

pub use error::ConstructionError;

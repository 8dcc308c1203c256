//! Error types for polar construction.
//!
//! Construction fails in three distinguishable ways: the parameters are
//! invalid, the cache directory or file cannot be accessed, or the external
//! z-parameter computation fails. Callers match on the variant to tell
//! "fix your parameters" from "fix your environment".

use crate::cache::CacheKey;
use polar_core::PolarError;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by external z-parameter computations.
pub type ComputeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while constructing a polar code.
#[derive(Error, Debug)]
pub enum ConstructionError {
    /// Invalid block length, information length, design SNR or frozen set.
    #[error("invalid code configuration: {0}")]
    Config(#[from] PolarError),

    /// Cache directory or file access failed.
    #[error("parameter cache I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external computation failed, timed out or returned invalid data.
    #[error("z-parameter computation failed for {key}: {source}")]
    Compute {
        key: CacheKey,
        #[source]
        source: ComputeError,
    },
}

impl ConstructionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConstructionError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn compute(key: &CacheKey, source: impl Into<ComputeError>) -> Self {
        ConstructionError::Compute {
            key: *key,
            source: source.into(),
        }
    }
}

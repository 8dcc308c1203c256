//! Persistent cache of AWGN z-parameter vectors.
//!
//! Each cache key maps to one text file under an explicit root directory:
//! `{root}/code_z_parameters_N{N}_Q{snr}_R{resolution}.dat`. A file holds N
//! newline-separated floats, optionally preceded by `#` comment lines that
//! document the key. Comments are never parsed back; the file name is the key.
//!
//! The cache is advisory. A missing, truncated or otherwise invalid entry is
//! recomputed through the configured `ZParameterSource` and replaced. New
//! entries are written to a temporary file in the same directory and renamed
//! into place, so concurrent writers never leave a partial file behind.

use crate::error::ConstructionError;
use crate::source::ZParameterSource;
use nom::IResult;
use nom::character::complete::space0;
use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::sequence::delimited;
use polar_common::consts::{
    CACHE_DIR_NAME, CACHE_FILE_EXTENSION, CACHE_FILE_PREFIX, DEFAULT_RESOLUTION, MIN_DESIGN_SNR_DB,
};
use polar_core::PolarError;
use polar_core::bit_utils::block_power;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Validated identity of one cached z-parameter vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheKey {
    /// Block length N, a power of two.
    pub block_size: usize,

    /// Design SNR in dB, strictly above `MIN_DESIGN_SNR_DB`.
    pub design_snr_db: f64,

    /// Positive construction resolution.
    pub resolution: u32,
}

impl CacheKey {
    /// Validates the key components.
    ///
    /// A non-positive `resolution` is replaced by `DEFAULT_RESOLUTION`, the
    /// only default this crate substitutes silently.
    ///
    /// # Errors
    ///
    /// `NotPowerOfTwo` or `BlockTooLarge` for a bad block length,
    /// `NonFiniteDesignSnr` for a NaN or infinite design SNR and
    /// `DesignSnrTooLow` for one at or below the model minimum.
    pub fn new(block_size: usize, design_snr_db: f64, resolution: i64) -> Result<Self, PolarError> {
        block_power(block_size)?;
        if !design_snr_db.is_finite() {
            return Err(PolarError::NonFiniteDesignSnr(design_snr_db));
        }
        if design_snr_db <= MIN_DESIGN_SNR_DB {
            return Err(PolarError::DesignSnrTooLow(design_snr_db));
        }
        Ok(Self {
            block_size,
            design_snr_db,
            resolution: resolve_resolution(resolution),
        })
    }

    /// Deterministic cache file name for this key.
    pub fn file_name(&self) -> String {
        format!(
            "{}_N{}_Q{:?}_R{}.{}",
            CACHE_FILE_PREFIX,
            self.block_size,
            self.design_snr_db,
            self.resolution,
            CACHE_FILE_EXTENSION
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={} design SNR={:?} dB resolution={}",
            self.block_size, self.design_snr_db, self.resolution
        )
    }
}

/// Maps an unset or non-positive resolution to `DEFAULT_RESOLUTION`.
pub fn resolve_resolution(resolution: i64) -> u32 {
    if resolution <= 0 {
        DEFAULT_RESOLUTION
    } else {
        u32::try_from(resolution).unwrap_or(u32::MAX)
    }
}

/// Per-user default cache directory.
///
/// `$XDG_CACHE_HOME/polar_construct` if set, else
/// `$HOME/.cache/polar_construct`. Returns `None` when neither variable is
/// available.
pub fn default_root() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    Some(base.join(CACHE_DIR_NAME))
}

/// Disk-backed memoization of an expensive z-parameter computation.
pub struct ParameterCache {
    root: PathBuf,
    source: Arc<dyn ZParameterSource>,
    timeout: Option<Duration>,
}

impl fmt::Debug for ParameterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterCache")
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ParameterCache {
    /// Creates a cache rooted at `root` that fills misses from `source`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>, source: Arc<dyn ZParameterSource>) -> Self {
        Self {
            root: root.into(),
            source,
            timeout: None,
        }
    }

    /// Bounds how long a cache miss waits for the external computation.
    ///
    /// The computation runs on a helper thread. On timeout the miss fails
    /// with a computation error and nothing is written; the helper thread is
    /// left to finish and its result is discarded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the entry for `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Returns the z-parameters for `key`, computing and persisting on a miss.
    ///
    /// # Returns
    ///
    /// N values in `[0, 1]`, an `Io` error if the cache cannot be read or
    /// written, or a `Compute` error if the external computation fails. A
    /// failed computation never leaves an entry behind.
    pub fn get(&self, key: &CacheKey) -> Result<Vec<f64>, ConstructionError> {
        if let Some(values) = self.load(key)? {
            debug!(key = %key, "z-parameter cache hit");
            return Ok(values);
        }

        info!(key = %key, "z-parameter cache miss, computing");
        let values = self.compute(key)?;
        self.store(key, &values)?;
        info!(key = %key, path = %self.path_for(key).display(), "z-parameters cached");
        Ok(values)
    }

    /// Reads the entry for `key`.
    ///
    /// Returns `Ok(None)` when the entry is missing or does not hold exactly
    /// N values in `[0, 1]`.
    pub fn load(&self, key: &CacheKey) -> Result<Option<Vec<f64>>, ConstructionError> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %path.display(), "discarding non-UTF-8 cache entry");
                return Ok(None);
            }
            Err(e) => return Err(ConstructionError::io(path, e)),
        };

        match parse_z_parameters(&contents, key.block_size) {
            Ok(values) => Ok(Some(values)),
            Err(reason) => {
                warn!(path = %path.display(), %reason, "discarding corrupted cache entry");
                Ok(None)
            }
        }
    }

    /// Persists `values` as the entry for `key`, replacing any existing file.
    pub fn store(&self, key: &CacheKey, values: &[f64]) -> Result<(), ConstructionError> {
        fs::create_dir_all(&self.root).map_err(|e| ConstructionError::io(&self.root, e))?;

        let path = self.path_for(key);
        let tmp = self.temp_path(key);
        if let Err(e) = write_entry(&tmp, key, values) {
            let _ = fs::remove_file(&tmp);
            return Err(ConstructionError::io(tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(ConstructionError::io(path, e));
        }
        Ok(())
    }

    fn temp_path(&self, key: &CacheKey) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{}.tmp",
            key.file_name(),
            std::process::id(),
            seq
        ))
    }

    /// Runs the external computation and validates its output.
    fn compute(&self, key: &CacheKey) -> Result<Vec<f64>, ConstructionError> {
        let values = match self.timeout {
            None => self
                .source
                .compute(key.block_size, key.design_snr_db, key.resolution)
                .map_err(|e| ConstructionError::compute(key, e))?,
            Some(timeout) => self.compute_with_timeout(key, timeout)?,
        };

        if values.len() != key.block_size {
            return Err(ConstructionError::compute(
                key,
                format!(
                    "expected {} z-parameters, got {}",
                    key.block_size,
                    values.len()
                ),
            ));
        }
        if let Some(bad) = values.iter().find(|z| !(0.0..=1.0).contains(*z)) {
            return Err(ConstructionError::compute(
                key,
                format!("z-parameter {} is outside [0, 1]", bad),
            ));
        }
        Ok(values)
    }

    fn compute_with_timeout(
        &self,
        key: &CacheKey,
        timeout: Duration,
    ) -> Result<Vec<f64>, ConstructionError> {
        let source = Arc::clone(&self.source);
        let k = *key;
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("z-parameters".into())
            .spawn(move || {
                let _ = tx.send(source.compute(k.block_size, k.design_snr_db, k.resolution));
            })
            .map_err(|e| ConstructionError::compute(key, e))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result.map_err(|e| ConstructionError::compute(key, e)),
            Err(RecvTimeoutError::Timeout) => Err(ConstructionError::compute(
                key,
                format!("no result within {:?}", timeout),
            )),
            Err(RecvTimeoutError::Disconnected) => Err(ConstructionError::compute(
                key,
                "computation thread exited without a result",
            )),
        }
    }
}

fn write_entry(path: &Path, key: &CacheKey, values: &[f64]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# polar code z-parameters")?;
    writeln!(out, "# block size: {}", key.block_size)?;
    writeln!(out, "# design SNR: {:?} dB", key.design_snr_db)?;
    writeln!(out, "# resolution: {}", key.resolution)?;
    for z in values {
        writeln!(out, "{:?}", z)?;
    }
    let file = out.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn value_line(input: &str) -> IResult<&str, f64> {
    all_consuming(delimited(space0, double, space0))(input)
}

/// Parses the body of a cache file.
///
/// Blank lines and lines starting with `#` are skipped. Every other line must
/// hold exactly one float in `[0, 1]`, and there must be `expected_len` of
/// them.
pub fn parse_z_parameters(contents: &str, expected_len: usize) -> Result<Vec<f64>, String> {
    let mut values = Vec::with_capacity(expected_len);
    for (lineno, line) in contents.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (_, z) =
            value_line(line).map_err(|_| format!("line {}: not a number: {:?}", lineno + 1, line))?;
        if !(0.0..=1.0).contains(&z) {
            return Err(format!("line {}: value {} outside [0, 1]", lineno + 1, z));
        }
        values.push(z);
    }
    if values.len() != expected_len {
        return Err(format!(
            "expected {} values, found {}",
            expected_len,
            values.len()
        ));
    }
    Ok(values)
}

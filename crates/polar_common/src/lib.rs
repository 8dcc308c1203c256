//! Common definitions and constants shared across the polar construction system.
//!
//! This module provides the channel model tag, the numerical limits of the
//! construction models, and the naming constants of the on-disk parameter
//! cache. These are shared by the algorithm core, the I/O layer and the host
//! tools so that every layer agrees on the same bounds.

#![cfg_attr(not(test), no_std)]

// Numerical bounds and defaults of the channel construction models.
//
// The AWGN construction is only defined above a minimum design SNR, and its
// fidelity knob falls back to a small default when unset. Both values are
// checked by every layer that accepts construction parameters.
pub mod consts {
    /// Lowest design SNR (in dB) for which the AWGN construction is defined.
    ///
    /// Corresponds to the Shannon limit for binary signalling at rate zero.
    /// Requested design SNRs must be strictly greater than this value.
    pub const MIN_DESIGN_SNR_DB: f64 = -1.5917;

    /// Resolution used when the caller leaves it unset or non-positive.
    ///
    /// The resolution controls how finely the noisy channel is quantised by
    /// the external z-parameter computation. It is part of the cache key.
    pub const DEFAULT_RESOLUTION: u32 = 2;

    /// File name prefix of persisted z-parameter vectors.
    pub const CACHE_FILE_PREFIX: &str = "code_z_parameters";

    /// File name extension of persisted z-parameter vectors.
    pub const CACHE_FILE_EXTENSION: &str = "dat";

    /// Directory name appended to the per-user cache location.
    pub const CACHE_DIR_NAME: &str = "polar_construct";

    /// Largest supported block length exponent.
    ///
    /// Bounds `log2(N)` so that bit-reversal widths always fit a `usize` on
    /// 32-bit targets.
    pub const MAX_BLOCK_POWER: u32 = 24;
}

/// Channel model tags understood by the construction facade.
///
/// The tag only names the model. The data each model needs to run (erasure
/// probability, design SNR and resolution, cache handle) travels with the
/// resolved construction model in the I/O layer.
pub mod channel {
    use core::fmt;
    use core::str::FromStr;

    /// Channel model used to rank the synthetic bit channels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ChannelKind {
        /// Binary erasure channel.
        ///
        /// Reliabilities follow a closed-form recursion and are cheap enough
        /// to recompute on every construction.
        Bec,

        /// Binary-input additive white Gaussian noise channel.
        ///
        /// Reliabilities come from an expensive external computation and are
        /// memoised on disk by the parameter cache.
        Awgn,
    }

    impl ChannelKind {
        /// Canonical lowercase name of the channel model.
        pub fn as_str(&self) -> &'static str {
            match self {
                ChannelKind::Bec => "bec",
                ChannelKind::Awgn => "awgn",
            }
        }
    }

    impl fmt::Display for ChannelKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Error returned when a channel name is not recognised.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UnknownChannel;

    impl fmt::Display for UnknownChannel {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("unknown channel model (expected 'bec' or 'awgn')")
        }
    }

    impl core::error::Error for UnknownChannel {}

    impl FromStr for ChannelKind {
        type Err = UnknownChannel;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            if s.eq_ignore_ascii_case("bec") || s.eq_ignore_ascii_case("erasure") {
                Ok(ChannelKind::Bec)
            } else if s.eq_ignore_ascii_case("awgn") || s.eq_ignore_ascii_case("noisy") {
                Ok(ChannelKind::Awgn)
            } else {
                Err(UnknownChannel)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::channel::ChannelKind;

    #[test]
    fn channel_names_parse_case_insensitively() {
        assert_eq!("BEC".parse::<ChannelKind>(), Ok(ChannelKind::Bec));
        assert_eq!("erasure".parse::<ChannelKind>(), Ok(ChannelKind::Bec));
        assert_eq!("Awgn".parse::<ChannelKind>(), Ok(ChannelKind::Awgn));
        assert!("rayleigh".parse::<ChannelKind>().is_err());
    }

    #[test]
    fn channel_names_round_trip_through_as_str() {
        for kind in [ChannelKind::Bec, ChannelKind::Awgn] {
            assert_eq!(kind.as_str().parse::<ChannelKind>(), Ok(kind));
        }
    }
}

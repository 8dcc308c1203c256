//! Shared transform and validation core for polar encoders and decoders.
//!
//! A `PolarCode` is built once per code configuration. Construction validates
//! the configuration and derives the information-bit positions and the
//! bit-reversal table. Every per-codeword operation afterwards is a pure
//! function of the immutable instance and its input, so one instance can be
//! shared by any number of encoder and decoder threads without locking.
//!
//! Bits are carried as `u8` values in `{0, 1}`.

use crate::PolarError;
use crate::bit_utils::{self, block_power};
use crate::selector::frozen_bit_mask;
use alloc::vec;
use alloc::vec::Vec;

/// Validated polar code configuration with its derived index tables.
///
/// Holds the block length N, the information length K, the `N - K` frozen
/// positions with their fixed values, the ascending information positions
/// (the complement of the frozen positions) and the bit-reversal permutation
/// for width `log2(N)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolarCode {
    /// Block length N, a power of two.
    block_size: usize,

    /// Information length K, with `0 < K < N`.
    num_info_bits: usize,

    /// `log2(N)`, the number of butterfly stages.
    power: u32,

    /// Frozen positions in the order they were given.
    frozen_bit_position: Vec<usize>,

    /// Value placed at `frozen_bit_position[j]` for each `j`.
    frozen_bit_values: Vec<u8>,

    /// Ascending complement of the frozen positions in `[0, N)`.
    info_bit_position: Vec<usize>,

    /// Bit-reversal permutation of `[0, N)`.
    bit_reverse_table: Vec<usize>,
}

impl PolarCode {
    /// Validates a code configuration and derives its index tables.
    ///
    /// Duplicate frozen positions are not rejected here. A configuration with
    /// duplicates has more than K information positions, so every per-call
    /// operation on a K-vector reports `LengthMismatch`. Use `new_strict` to
    /// reject duplicates up front.
    ///
    /// # Arguments
    ///
    /// * `block_size` - Block length N, a power of two
    /// * `num_info_bits` - Information length K, with `0 < K < N`
    /// * `frozen_bit_position` - `N - K` positions in `[0, N)`
    /// * `frozen_bit_values` - Values for the frozen positions, all zero if `None`
    ///
    /// # Returns
    ///
    /// The validated code, or the first configuration error found.
    pub fn new(
        block_size: usize,
        num_info_bits: usize,
        frozen_bit_position: Vec<usize>,
        frozen_bit_values: Option<Vec<u8>>,
    ) -> Result<Self, PolarError> {
        let power = block_power(block_size)?;

        if num_info_bits == 0 || num_info_bits >= block_size {
            return Err(PolarError::InvalidInfoLength {
                block_size,
                num_info_bits,
            });
        }

        let num_frozen = block_size - num_info_bits;
        if frozen_bit_position.len() != num_frozen {
            return Err(PolarError::FrozenCountMismatch {
                expected: num_frozen,
                actual: frozen_bit_position.len(),
            });
        }

        let mask = frozen_bit_mask(&frozen_bit_position, block_size)?;

        let frozen_bit_values = match frozen_bit_values {
            Some(values) => {
                if values.len() != num_frozen {
                    return Err(PolarError::FrozenValuesLengthMismatch {
                        expected: num_frozen,
                        actual: values.len(),
                    });
                }
                bit_utils::check_bits(&values)?;
                values
            }
            None => vec![0; num_frozen],
        };

        let info_bit_position = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &frozen)| if frozen == 0 { Some(i) } else { None })
            .collect();

        Ok(Self {
            block_size,
            num_info_bits,
            power,
            frozen_bit_position,
            frozen_bit_values,
            info_bit_position,
            bit_reverse_table: bit_utils::bit_reverse_table(power),
        })
    }

    /// Like `new`, but additionally rejects duplicate frozen positions.
    pub fn new_strict(
        block_size: usize,
        num_info_bits: usize,
        frozen_bit_position: Vec<usize>,
        frozen_bit_values: Option<Vec<u8>>,
    ) -> Result<Self, PolarError> {
        let code = Self::new(
            block_size,
            num_info_bits,
            frozen_bit_position,
            frozen_bit_values,
        )?;
        let mut seen = vec![false; block_size];
        for &p in &code.frozen_bit_position {
            if core::mem::replace(&mut seen[p], true) {
                return Err(PolarError::DuplicatePosition(p));
            }
        }
        Ok(code)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn num_info_bits(&self) -> usize {
        self.num_info_bits
    }

    pub fn num_frozen_bits(&self) -> usize {
        self.frozen_bit_position.len()
    }

    /// Number of butterfly stages, `log2(N)`.
    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn frozen_bit_position(&self) -> &[usize] {
        &self.frozen_bit_position
    }

    pub fn frozen_bit_values(&self) -> &[u8] {
        &self.frozen_bit_values
    }

    pub fn info_bit_position(&self) -> &[usize] {
        &self.info_bit_position
    }

    pub fn bit_reverse_table(&self) -> &[usize] {
        &self.bit_reverse_table
    }

    /// Length-N mask with 1 at every frozen position.
    pub fn frozen_bit_mask(&self) -> Vec<u8> {
        let mut mask = vec![1u8; self.block_size];
        for &i in &self.info_bit_position {
            mask[i] = 0;
        }
        mask
    }

    /// Places the frozen values and the information bits into an N-vector.
    ///
    /// `frozen_bit_values[j]` lands at `frozen_bit_position[j]` and `u[i]` at
    /// `info_bit_position[i]`.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if `u` does not have one entry per information position.
    pub fn insert_frozen_bits(&self, u: &[u8]) -> Result<Vec<u8>, PolarError> {
        self.check_len(u.len(), self.info_bit_position.len())?;
        let mut frame = vec![0u8; self.block_size];
        for (&pos, &value) in self.frozen_bit_position.iter().zip(&self.frozen_bit_values) {
            frame[pos] = value;
        }
        for (&pos, &bit) in self.info_bit_position.iter().zip(u) {
            frame[pos] = bit;
        }
        Ok(frame)
    }

    /// Gathers the information positions of an N-vector.
    ///
    /// Left inverse of `insert_frozen_bits`.
    pub fn extract_info_bits(&self, y: &[u8]) -> Result<Vec<u8>, PolarError> {
        self.check_len(y.len(), self.block_size)?;
        Ok(self.info_bit_position.iter().map(|&pos| y[pos]).collect())
    }

    /// Permutes an N-vector by the bit-reversal table: `out[i] = v[table[i]]`.
    pub fn reverse_bits(&self, v: &[u8]) -> Result<Vec<u8>, PolarError> {
        self.check_len(v.len(), self.block_size)?;
        Ok(self.bit_reverse_table.iter().map(|&src| v[src]).collect())
    }

    /// Applies the XOR butterfly network in place.
    ///
    /// Stage `s` splits the vector into blocks of `2^(s+1)` and XORs the lower
    /// half of each block into the upper half, position by position. After
    /// `log2(N)` stages the vector holds `v * F^{(x)n}` with `F = [[1,0],[1,1]]`.
    pub fn transform_in_place(&self, v: &mut [u8]) -> Result<(), PolarError> {
        self.check_len(v.len(), self.block_size)?;
        let mut half = 1;
        while half < self.block_size {
            for block in v.chunks_exact_mut(2 * half) {
                let (upper, lower) = block.split_at_mut(half);
                for (u, &l) in upper.iter_mut().zip(lower.iter()) {
                    *u ^= l;
                }
            }
            half <<= 1;
        }
        Ok(())
    }

    /// Returns the XOR butterfly transform of an N-vector.
    pub fn transform(&self, v: &[u8]) -> Result<Vec<u8>, PolarError> {
        let mut out = v.to_vec();
        self.transform_in_place(&mut out)?;
        Ok(out)
    }

    /// Encodes a prepared N-vector: `transform(reverse_bits(v))`.
    ///
    /// This is the entry point encoders call per codeword. The result matches
    /// a production encoder that uses the same bit-index convention.
    pub fn encode(&self, v: &[u8]) -> Result<Vec<u8>, PolarError> {
        let mut out = self.reverse_bits(v)?;
        self.transform_in_place(&mut out)?;
        Ok(out)
    }

    /// Encodes into a caller-owned buffer of length N.
    pub fn encode_into(&self, v: &[u8], out: &mut [u8]) -> Result<(), PolarError> {
        self.check_len(v.len(), self.block_size)?;
        self.check_len(out.len(), self.block_size)?;
        for (slot, &src) in out.iter_mut().zip(&self.bit_reverse_table) {
            *slot = v[src];
        }
        self.transform_in_place(out)
    }

    /// Inserts the frozen bits around `u` and encodes the frame.
    pub fn encode_info(&self, u: &[u8]) -> Result<Vec<u8>, PolarError> {
        let frame = self.insert_frozen_bits(u)?;
        self.encode(&frame)
    }

    fn check_len(&self, actual: usize, expected: usize) -> Result<(), PolarError> {
        if actual == expected {
            Ok(())
        } else {
            Err(PolarError::LengthMismatch { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bec::bec_capacities;
    use crate::selector::frozen_from_capacities;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Row-vector times the Kronecker power of `[[1,0],[1,1]]`, built densely.
    fn generator_encode(u: &[u8]) -> Vec<u8> {
        let n = u.len();
        let mut g = vec![vec![1u8]];
        while g.len() < n {
            let m = g.len();
            let mut next = vec![vec![0u8; 2 * m]; 2 * m];
            for r in 0..m {
                for c in 0..m {
                    next[r][c] = g[r][c];
                    next[r + m][c] = g[r][c];
                    next[r + m][c + m] = g[r][c];
                }
            }
            g = next;
        }
        (0..n)
            .map(|c| (0..n).fold(0u8, |acc, r| acc ^ (u[r] & g[r][c])))
            .collect()
    }

    fn random_bits(rng: &mut StdRng, n: usize) -> Vec<u8> {
        (0..n).map(|_| rng.gen_range(0..=1u8)).collect()
    }

    #[test]
    fn worked_example_n4() {
        let code = PolarCode::new(4, 2, vec![0, 1], None).unwrap();
        assert_eq!(code.bit_reverse_table(), &[0, 2, 1, 3]);

        let v = [1, 0, 1, 0];
        let reversed = code.reverse_bits(&v).unwrap();
        assert_eq!(reversed, vec![1, 1, 0, 0]);

        let mut stage0 = reversed.clone();
        for pair in stage0.chunks_exact_mut(2) {
            pair[0] ^= pair[1];
        }
        assert_eq!(stage0, vec![0, 1, 0, 0]);

        assert_eq!(code.encode(&v).unwrap(), vec![0, 1, 0, 0]);
    }

    #[test]
    fn transform_matches_generator_matrix() {
        let mut rng = StdRng::seed_from_u64(7);
        for power in 1..=6 {
            let n = 1usize << power;
            let code = PolarCode::new(n, n / 2, (0..n / 2).collect(), None).unwrap();
            for _ in 0..20 {
                let v = random_bits(&mut rng, n);
                assert_eq!(code.transform(&v).unwrap(), generator_encode(&v));
            }
        }
    }

    #[test]
    fn transform_is_an_involution() {
        let mut rng = StdRng::seed_from_u64(11);
        let code = PolarCode::new(64, 32, (0..32).collect(), None).unwrap();
        for _ in 0..20 {
            let v = random_bits(&mut rng, 64);
            let twice = code.transform(&code.transform(&v).unwrap()).unwrap();
            assert_eq!(twice, v);
        }
    }

    #[test]
    fn encode_into_matches_encode() {
        let mut rng = StdRng::seed_from_u64(3);
        let code = PolarCode::new(32, 16, (0..16).collect(), None).unwrap();
        let v = random_bits(&mut rng, 32);
        let mut out = vec![0u8; 32];
        code.encode_into(&v, &mut out).unwrap();
        assert_eq!(out, code.encode(&v).unwrap());
    }

    #[test]
    fn insert_then_extract_returns_the_information_bits() {
        let mut rng = StdRng::seed_from_u64(42);
        for power in 1..=8 {
            let n = 1usize << power;
            let k = rng.gen_range(1..n);
            let caps = bec_capacities(0.5, n).unwrap();
            let frozen = frozen_from_capacities(&caps, n - k).unwrap();
            let values = random_bits(&mut rng, n - k);
            let code = PolarCode::new(n, k, frozen.clone(), Some(values.clone())).unwrap();

            let u = random_bits(&mut rng, k);
            let frame = code.insert_frozen_bits(&u).unwrap();
            assert_eq!(code.extract_info_bits(&frame).unwrap(), u);
            for (&p, &value) in frozen.iter().zip(&values) {
                assert_eq!(frame[p], value);
            }
        }
    }

    #[test]
    fn info_positions_are_the_ascending_complement() {
        let code = PolarCode::new(8, 4, vec![6, 1, 3, 5], None).unwrap();
        assert_eq!(code.info_bit_position(), &[0, 2, 4, 7]);
        assert_eq!(code.frozen_bit_mask(), vec![0, 1, 0, 1, 0, 1, 1, 0]);
        assert_eq!(code.frozen_bit_values(), &[0, 0, 0, 0]);
        assert_eq!(code.num_frozen_bits(), 4);
        assert_eq!(code.power(), 3);
    }

    #[test]
    fn configuration_errors_are_raised_at_construction() {
        assert_eq!(
            PolarCode::new(12, 4, vec![0; 8], None),
            Err(PolarError::NotPowerOfTwo(12))
        );
        assert_eq!(
            PolarCode::new(8, 8, vec![], None),
            Err(PolarError::InvalidInfoLength {
                block_size: 8,
                num_info_bits: 8
            })
        );
        assert_eq!(
            PolarCode::new(8, 4, vec![0, 1, 2], None),
            Err(PolarError::FrozenCountMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            PolarCode::new(8, 4, vec![0, 1, 2, 8], None),
            Err(PolarError::PositionOutOfRange {
                position: 8,
                block_size: 8
            })
        );
        assert_eq!(
            PolarCode::new(8, 4, vec![0, 1, 2, 3], Some(vec![0, 1])),
            Err(PolarError::FrozenValuesLengthMismatch {
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(
            PolarCode::new(8, 4, vec![0, 1, 2, 3], Some(vec![0, 1, 3, 0])),
            Err(PolarError::InvalidBit(3))
        );
    }

    #[test]
    fn duplicates_are_only_rejected_by_strict_validation() {
        let permissive = PolarCode::new(8, 4, vec![0, 1, 1, 2], None).unwrap();
        assert_eq!(permissive.info_bit_position().len(), 5);
        assert_eq!(
            permissive.insert_frozen_bits(&[1, 0, 1, 0]),
            Err(PolarError::LengthMismatch {
                expected: 5,
                actual: 4
            })
        );
        assert_eq!(
            PolarCode::new_strict(8, 4, vec![0, 1, 1, 2], None),
            Err(PolarError::DuplicatePosition(1))
        );
        assert!(PolarCode::new_strict(8, 4, vec![0, 1, 2, 4], None).is_ok());
    }

    #[test]
    fn wrong_call_lengths_are_reported() {
        let code = PolarCode::new(8, 4, vec![0, 1, 2, 4], None).unwrap();
        assert_eq!(
            code.encode(&[0; 4]),
            Err(PolarError::LengthMismatch {
                expected: 8,
                actual: 4
            })
        );
        assert!(code.extract_info_bits(&[0; 7]).is_err());
        assert!(code.encode_into(&[0; 8], &mut [0; 4]).is_err());
    }

    #[test]
    fn encode_info_inserts_then_encodes() {
        let code = PolarCode::new(8, 4, vec![0, 1, 2, 4], Some(vec![1, 0, 0, 1])).unwrap();
        let u = [1, 1, 0, 1];
        let expected = code.encode(&code.insert_frozen_bits(&u).unwrap()).unwrap();
        assert_eq!(code.encode_info(&u).unwrap(), expected);
    }
}

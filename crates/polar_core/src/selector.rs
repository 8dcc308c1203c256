//! Reliability-based frozen-set selection.
//!
//! The frozen set of a polar code is the set of the `N - K` least reliable
//! synthetic channels. Reliability vectors come in two polarities: capacities
//! (larger is better) and error bounds such as Bhattacharyya parameters
//! (larger is worse). The selector ranks indices by their value in the given
//! polarity and breaks ties toward the lower index, which is the index a
//! front-to-back scan for the extreme value finds first.

use crate::PolarError;
use alloc::vec;
use alloc::vec::Vec;

/// Orientation of a reliability vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Larger values are more reliable; the lowest values are frozen first.
    Capacity,

    /// Larger values are less reliable; the highest values are frozen first.
    ErrorBound,
}

/// Selects the `count` least reliable indices of `values`.
///
/// Equivalent to repeatedly extracting the index of the single worst
/// remaining entry (first occurrence on ties) and neutralising it, but runs in
/// `O(N log N)` with one stable sort. The values are compared with
/// `f64::total_cmp`, so a NaN ranks above every number.
///
/// # Arguments
///
/// * `values` - Reliability vector in synthesis order
/// * `count` - Number of frozen indices to select
/// * `polarity` - Orientation of `values`
///
/// # Returns
///
/// `count` distinct indices in ascending order, or `SelectionTooLarge` if
/// `count` exceeds the vector length.
pub fn select_frozen(
    values: &[f64],
    count: usize,
    polarity: Polarity,
) -> Result<Vec<usize>, PolarError> {
    if count > values.len() {
        return Err(PolarError::SelectionTooLarge {
            requested: count,
            available: values.len(),
        });
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    match polarity {
        Polarity::Capacity => order.sort_by(|&a, &b| values[a].total_cmp(&values[b])),
        Polarity::ErrorBound => order.sort_by(|&a, &b| values[b].total_cmp(&values[a])),
    }

    let mut frozen = order;
    frozen.truncate(count);
    frozen.sort_unstable();
    Ok(frozen)
}

/// Selects frozen indices from a capacity vector (lowest first).
pub fn frozen_from_capacities(capacities: &[f64], count: usize) -> Result<Vec<usize>, PolarError> {
    select_frozen(capacities, count, Polarity::Capacity)
}

/// Selects frozen indices from a Bhattacharyya parameter vector (highest first).
pub fn frozen_from_z_parameters(z_params: &[f64], count: usize) -> Result<Vec<usize>, PolarError> {
    select_frozen(z_params, count, Polarity::ErrorBound)
}

/// Builds a length-`block_size` mask with 1 at every frozen position.
///
/// # Errors
///
/// `PositionOutOfRange` if a position is not below `block_size`.
pub fn frozen_bit_mask(positions: &[usize], block_size: usize) -> Result<Vec<u8>, PolarError> {
    let mut mask = vec![0u8; block_size];
    for &p in positions {
        match mask.get_mut(p) {
            Some(slot) => *slot = 1,
            None => {
                return Err(PolarError::PositionOutOfRange {
                    position: p,
                    block_size,
                });
            }
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Scan-and-neutralise selection, `O(N * count)`.
    fn naive_select(values: &[f64], count: usize, polarity: Polarity) -> Vec<usize> {
        let mut work = values.to_vec();
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            let mut best = 0;
            for i in 1..work.len() {
                let better = match polarity {
                    Polarity::Capacity => work[i] < work[best],
                    Polarity::ErrorBound => work[i] > work[best],
                };
                if better {
                    best = i;
                }
            }
            picked.push(best);
            work[best] = match polarity {
                Polarity::Capacity => 2.0,
                Polarity::ErrorBound => -1.0,
            };
        }
        picked.sort_unstable();
        picked
    }

    #[test]
    fn lowest_capacities_are_frozen() {
        let caps = [0.9, 0.1, 0.5, 0.2, 0.95, 0.3, 0.05, 0.8];
        assert_eq!(frozen_from_capacities(&caps, 4).unwrap(), vec![1, 3, 5, 6]);
    }

    #[test]
    fn highest_z_parameters_are_frozen() {
        let z = [0.1, 0.9, 0.5, 0.8, 0.05, 0.7, 0.95, 0.2];
        assert_eq!(frozen_from_z_parameters(&z, 4).unwrap(), vec![1, 3, 5, 6]);
    }

    #[test]
    fn ties_resolve_to_the_first_index() {
        let caps = [0.5, 0.2, 0.2, 0.2, 0.9];
        assert_eq!(frozen_from_capacities(&caps, 2).unwrap(), vec![1, 2]);
        let z = [0.7, 0.7, 0.1, 0.7];
        assert_eq!(frozen_from_z_parameters(&z, 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn matches_naive_reference_on_random_vectors() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let n = 1usize << rng.gen_range(1..9);
            let values: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>()).collect();
            let count = rng.gen_range(0..=n);
            for polarity in [Polarity::Capacity, Polarity::ErrorBound] {
                assert_eq!(
                    select_frozen(&values, count, polarity).unwrap(),
                    naive_select(&values, count, polarity)
                );
            }
        }
    }

    #[test]
    fn selection_has_no_duplicates() {
        let values = vec![0.0; 32];
        let frozen = frozen_from_capacities(&values, 32).unwrap();
        assert_eq!(frozen, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn oversized_selection_is_rejected() {
        assert_eq!(
            frozen_from_capacities(&[0.1, 0.2], 3),
            Err(PolarError::SelectionTooLarge {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn mask_marks_frozen_positions() {
        assert_eq!(frozen_bit_mask(&[0, 2, 3], 6).unwrap(), vec![1, 0, 1, 1, 0, 0]);
        assert_eq!(
            frozen_bit_mask(&[6], 6),
            Err(PolarError::PositionOutOfRange {
                position: 6,
                block_size: 6
            })
        );
    }
}

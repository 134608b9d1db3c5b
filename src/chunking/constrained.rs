use log::debug;

use super::{Constraints, Sizing};
use crate::internal_prelude::*;

/// Target chunk byte volume: the budget, limited by what `max_chunks` chunks
/// would need and raised to `min_chunk_size`.
fn ideal_volume(variable: &VariableShape, sizing: Sizing, constraints: &Constraints) -> f64 {
    let total = variable.iter().map(|&d| d as f64).product::<f64>() * sizing.element_size as f64;
    let per_chunk = match constraints.get_max_chunks() {
        Some(max_chunks) => total / max_chunks as f64,
        None => total,
    };
    let mut ideal = per_chunk.min(sizing.size_budget as f64);
    if let Some(min_chunk_size) = constraints.get_min_chunk_size() {
        ideal = ideal.max(min_chunk_size as f64);
    }
    ideal
}

/// Spreads the target volume geometrically over the axes, innermost last.
fn geometric_guess(dims: &[Ix], element_size: usize, ideal: f64) -> Vec<Ix> {
    let ndim = dims.len();
    let mut prefix = 1.;
    dims.iter()
        .enumerate()
        .map(|(i, &d)| {
            prefix *= d as f64;
            let share = ideal / (element_size as f64 * prefix);
            let c = share.powf(1. / (ndim - i) as f64).round_ties_even();
            (c as Ix).clamp(1, d)
        })
        .collect()
}

/// Doubles chunk axes (outermost first) while the chunk count exceeds
/// `max_chunks` and the grown chunk still fits the budget.
fn grow_to_max_chunks(chunk: &mut [Ix], dims: &[Ix], sizing: Sizing, max_chunks: usize) {
    while chunk_count(dims, chunk) > max_chunks {
        let grown = (0..chunk.len()).find(|&i| {
            if chunk[i] >= dims[i] {
                return false;
            }
            let previous = chunk[i];
            chunk[i] = (previous * 2).min(dims[i]);
            if sizing.fits(chunk) {
                true
            } else {
                chunk[i] = previous;
                false
            }
        });
        match grown {
            Some(axis) => debug!("grew axis {} to {:?} to reduce the chunk count", axis, chunk),
            None => {
                debug!(
                    "cannot satisfy max_chunks={} within {} bytes, keeping {:?}",
                    max_chunks, sizing.size_budget, chunk
                );
                break;
            }
        }
    }
}

pub fn solve(variable: &VariableShape, sizing: Sizing, constraints: &Constraints) -> ChunkShape {
    let dims = variable.dims();
    let ideal = ideal_volume(variable, sizing, constraints);
    let mut chunk = geometric_guess(dims, sizing.element_size, ideal);
    debug!("constrained chunking: ideal chunk of {:.1} bytes, initial guess {:?}", ideal, chunk);

    if constraints.get_force_power_of_two() {
        chunk.iter_mut().for_each(|c| *c = prev_power_of_two(*c));
    }

    if let Some(divisors) = constraints.get_spatial_divisors() {
        for (c, &d) in chunk.iter_mut().zip(dims).skip(1) {
            *c = largest_divisor(d, divisors).unwrap_or_else(|| {
                debug!("no spatial divisor of {} in {:?}, falling back to the extent", d, divisors);
                d
            });
        }
    }

    shrink_outer_first(&mut chunk, sizing.element_size, sizing.size_budget);
    clamp_to_extents(&mut chunk, dims);

    if let Some(max_chunks) = constraints.get_max_chunks() {
        grow_to_max_chunks(&mut chunk, dims, sizing, max_chunks);
    }

    debug!("constrained chunk shape for {}: {:?}", variable, chunk);
    ChunkShape::from_vec(chunk)
}

#[cfg(test)]
pub mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chunking::DEFAULT_SPATIAL_DIVISORS;

    fn check(dims: &[Ix], size_budget: usize, constraints: &Constraints) -> Vec<Ix> {
        let variable = VariableShape::new(dims).unwrap();
        solve(&variable, Sizing::new(4, size_budget).unwrap(), constraints).into_vec()
    }

    fn pow2_divisors() -> Constraints {
        let mut constraints = Constraints::new();
        constraints.force_power_of_two(true).spatial_divisors(DEFAULT_SPATIAL_DIVISORS);
        constraints
    }

    #[test]
    pub fn test_ideal_volume() {
        let sizing = Sizing::new(4, 4096).unwrap();
        let variable = VariableShape::new([10, 10]).unwrap();
        assert_eq!(ideal_volume(&variable, sizing, &Constraints::new()), 400.);
        assert_eq!(ideal_volume(&variable, sizing, Constraints::new().max_chunks(4)), 100.);
        assert_eq!(ideal_volume(&variable, sizing, Constraints::new().min_chunk_size(8192)), 8192.);
        let variable = VariableShape::new([1000, 1000]).unwrap();
        assert_eq!(ideal_volume(&variable, sizing, &Constraints::new()), 4096.);
    }

    #[test]
    pub fn test_geometric_guess() {
        assert_eq!(geometric_guess(&[10, 10], 4, 400.), vec![3, 1]);
        assert_eq!(geometric_guess(&[2, 3, 4, 5], 4, 480.), vec![2, 3, 2, 1]);
        assert_eq!(geometric_guess(&[1000, 1000, 1000], 4, 4096.), vec![1, 1, 1]);
    }

    #[test]
    pub fn test_solve_unconstrained() {
        let none = Constraints::new();
        assert_eq!(check(&[1000, 1000, 1000], 4096, &none), vec![1, 1, 1]);
        assert_eq!(check(&[48, 9, 9], 4096, &none), vec![3, 2, 1]);
        assert_eq!(check(&[100, 2600, 2600], 4096, &none), vec![2, 1, 1]);
        assert_eq!(check(&[2, 3, 1_000_000], 4096, &none), vec![2, 3, 1]);
        assert_eq!(check(&[10, 10], 4096, &none), vec![3, 1]);
        assert_eq!(check(&[2, 3, 4, 5], 4096, &none), vec![2, 3, 2, 1]);
    }

    #[test]
    pub fn test_solve_power_of_two_divisors() {
        let constraints = pow2_divisors();
        // 2600 has no divisor in the set: the extent is kept, then shrunk to the budget
        assert_eq!(check(&[100, 2600, 2600], 4096, &constraints), vec![1, 1, 650]);
        assert_eq!(check(&[100, 2048, 4096], 4096, &constraints), vec![1, 1, 1024]);
        assert_eq!(check(&[100, 2048, 4096], 1 << 24, &constraints), vec![1, 2048, 2048]);
    }

    #[test]
    pub fn test_solve_divisor_fallback() {
        let mut constraints = Constraints::new();
        constraints.spatial_divisors([7]);
        // 7 divides 14 but not 10, so the 10 axis falls back to its extent
        assert_eq!(check(&[1, 14, 10], 1 << 20, &constraints), vec![1, 7, 10]);

        // the fallback extent is not rounded to a power of two
        constraints.force_power_of_two(true);
        assert_eq!(check(&[1, 14, 10], 1 << 20, &constraints), vec![1, 7, 10]);
        assert_eq!(check(&[4, 3000, 2600], 1 << 30, &pow2_divisors()), vec![4, 3000, 2600]);
    }

    #[test]
    pub fn test_solve_max_chunks() {
        let mut constraints = Constraints::new();
        constraints.max_chunks(10);
        let chunk = check(&[100, 400, 400], 1 << 20, &constraints);
        assert_eq!(chunk, vec![100, 400, 4]);
        assert!(nbytes(&chunk, 4) <= 1 << 20);

        let mut dims = vec![20, 20];
        let chunk = check(&dims, 4096, Constraints::new().max_chunks(1));
        assert_eq!(chunk, vec![20, 20]);
        assert_eq!(chunk_count(&dims, &chunk), 1);

        // unsatisfiable: best effort within the budget
        dims = vec![1000, 1000];
        let chunk = check(&dims, 4096, Constraints::new().max_chunks(1));
        assert!(nbytes(&chunk, 4) <= 4096);
        assert!(chunk_count(&dims, &chunk) > 1);
    }
}

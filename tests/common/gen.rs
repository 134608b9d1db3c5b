use std::iter;

use rand::prelude::{Rng, SliceRandom};

use rekx::{Constraints, VariableShape, DEFAULT_SPATIAL_DIVISORS};

/// Extents are mostly small (edge cases) or climate-grid sized.
pub fn gen_extent<R: Rng + ?Sized>(rng: &mut R) -> usize {
    if rng.gen_bool(0.3) {
        rng.gen_range(1..=16)
    } else {
        rng.gen_range(1..=10_000)
    }
}

pub fn gen_shape<R: Rng + ?Sized>(rng: &mut R, ndim: usize) -> VariableShape {
    let dims: Vec<usize> = iter::repeat(()).map(|_| gen_extent(rng)).take(ndim).collect();
    VariableShape::new(dims).unwrap()
}

pub fn gen_element_size<R: Rng + ?Sized>(rng: &mut R) -> usize {
    *[1, 2, 4, 8].choose(rng).unwrap()
}

/// A budget of `element_size * 2^k` bytes.
pub fn gen_size_budget<R: Rng + ?Sized>(rng: &mut R, element_size: usize) -> usize {
    element_size << rng.gen_range(0..20u32)
}

pub fn gen_constraints<R: Rng + ?Sized>(rng: &mut R) -> Constraints {
    let mut constraints = Constraints::new();
    if rng.gen_bool(0.5) {
        constraints.max_chunks(rng.gen_range(1..=1_000_000));
    }
    if rng.gen_bool(0.5) {
        constraints.min_chunk_size(rng.gen_range(1..=1 << 20));
    }
    constraints.force_power_of_two(rng.gen_bool(0.5));
    if rng.gen_bool(0.5) {
        constraints.spatial_divisors(DEFAULT_SPATIAL_DIVISORS);
    }
    constraints
}

use std::collections::BTreeSet;

use crate::internal_prelude::*;

/// Returns true if `n` is a (positive) power of two.
pub fn is_power_of_two(n: Ix) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Rounds `n` down to the nearest power of two (`0` maps to `1`).
pub fn prev_power_of_two(n: Ix) -> Ix {
    if n == 0 {
        1
    } else {
        1 << (Ix::BITS - 1 - n.leading_zeros())
    }
}

/// Floor division of non-negative floats, computed through the remainder
/// (`(a - a % b) / b`) rather than by truncating `a / b`; the two can differ
/// by one when `a / b` rounds up to an integer.
pub fn floor_div(a: f64, b: f64) -> f64 {
    let div = (a - a % b) / b;
    let floor = div.floor();
    if div - floor > 0.5 {
        floor + 1.
    } else {
        floor
    }
}

/// Largest value in `divisors` that evenly divides `n`, if any.
pub fn largest_divisor(n: Ix, divisors: &BTreeSet<Ix>) -> Option<Ix> {
    divisors.iter().rev().copied().find(|&d| d != 0 && n % d == 0)
}

/// Number of elements in a block of the given shape.
pub fn volume(shape: &[Ix]) -> Ix {
    shape.iter().product()
}

/// Byte size of a block of the given shape, saturating on overflow.
pub fn nbytes(shape: &[Ix], element_size: usize) -> usize {
    shape.iter().fold(element_size, |acc, &d| acc.saturating_mul(d))
}

/// Number of chunks along each axis needed to tile `dims`.
pub fn chunk_grid(dims: &[Ix], chunk: &[Ix]) -> Vec<Ix> {
    dims.iter().zip(chunk).map(|(&d, &c)| d.div_ceil(c)).collect()
}

/// Total number of chunks needed to tile `dims`.
pub fn chunk_count(dims: &[Ix], chunk: &[Ix]) -> usize {
    chunk_grid(dims, chunk).into_iter().fold(1, usize::saturating_mul)
}

/// Clamps every axis into `[1, extent]`.
pub fn clamp_to_extents(chunk: &mut [Ix], dims: &[Ix]) {
    for (c, &d) in chunk.iter_mut().zip(dims) {
        *c = (*c).clamp(1, d);
    }
}

/// Greedy shrink used by the constrained solver: halve the outermost axis that
/// can still be halved until the chunk fits the budget.
pub fn shrink_outer_first(chunk: &mut [Ix], element_size: usize, size_budget: usize) {
    while nbytes(chunk, element_size) > size_budget {
        match chunk.iter_mut().find(|c| **c > 1) {
            Some(c) => *c /= 2,
            None => break,
        }
    }
}

/// Caps the largest axis (outermost on ties) at whatever the remaining axes
/// leave of the element budget, until the chunk fits.
pub fn shrink_largest_first(chunk: &mut [Ix], element_size: usize, size_budget: usize) {
    let max_values = (size_budget / element_size).max(1);
    while nbytes(chunk, element_size) > size_budget && chunk.iter().any(|&c| c > 1) {
        let mut axis = 0;
        for (i, &c) in chunk.iter().enumerate() {
            if c > chunk[axis] {
                axis = i;
            }
        }
        let others = volume(chunk) / chunk[axis];
        chunk[axis] = (max_values / others).max(1);
    }
}

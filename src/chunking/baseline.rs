use log::{debug, trace};

use super::Sizing;
use crate::internal_prelude::*;

/// Initial guess before fine-tuning: balanced number of chunks per axis.
fn balanced_guess(dims: &[Ix], max_values: usize) -> Vec<Ix> {
    let chunk_count = dims.iter().map(|&d| d as f64).product::<f64>() / max_values as f64;
    let mut axes = chunk_count.powf(0.25);
    debug!("balanced chunking: {:.3} ideal chunks, {:.3} chunks per axis", chunk_count, axes);

    let mut chunk = Vec::with_capacity(dims.len());

    let outer = dims[0] as f64;
    let ratio = outer / (axes * axes);
    if ratio < 1. {
        // outer axis can't be split that finely, push the rest inwards
        chunk.push(1);
        axes /= ratio.sqrt();
    } else {
        chunk.push(floor_div(outer, axes * axes) as Ix);
    }

    let sizing = dims[1..]
        .iter()
        .map(|&d| d as f64)
        .filter(|&d| d / axes < 1.)
        .fold(1., |acc, d| acc * axes / d);
    for &d in &dims[1..] {
        let d = d as f64;
        chunk.push(if d / axes < 1. { 1 } else { floor_div(sizing * d, axes) as Ix });
    }

    clamp_to_extents(&mut chunk, dims);
    chunk
}

/// Tries every `+0/+1` perturbation of `base` and returns the largest one that
/// fits; bit `D-1-i` of the perturbation index drives axis `i`.
fn fine_tune(base: &[Ix], dims: &[Ix], sizing: Sizing) -> Vec<Ix> {
    let ndim = base.len();
    let mut best = base.to_vec();
    let mut best_bytes = 0;
    let mut candidate = vec![0; ndim];
    for bits in 0..1usize << ndim {
        for (i, c) in candidate.iter_mut().enumerate() {
            *c = (base[i] + ((bits >> (ndim - 1 - i)) & 1)).min(dims[i]);
        }
        let bytes = sizing.nbytes(&candidate);
        trace!("fine-tuning candidate {:?}: {} bytes", candidate, bytes);
        if bytes > best_bytes && bytes <= sizing.size_budget {
            best_bytes = bytes;
            best.copy_from_slice(&candidate);
        }
    }
    best
}

pub fn solve(variable: &VariableShape, sizing: Sizing) -> ChunkShape {
    let dims = variable.dims();
    let base = balanced_guess(dims, sizing.max_values());
    let mut chunk = fine_tune(&base, dims, sizing);
    if !sizing.fits(&chunk) {
        debug!("balanced chunk {:?} exceeds {} bytes, shrinking", chunk, sizing.size_budget);
        shrink_largest_first(&mut chunk, sizing.element_size, sizing.size_budget);
    }
    debug!("balanced chunk shape for {}: {:?}", variable, chunk);
    ChunkShape::from_vec(chunk)
}

use log::debug;

use super::{Constraints, Sizing};
use crate::internal_prelude::*;

pub fn solve(variable: &VariableShape, sizing: Sizing, constraints: &Constraints) -> ChunkShape {
    let (outer, lat, lon) = (variable[0], variable[1], variable[2]);
    let spatial = lat.min(lon);

    let mut s = match constraints.get_spatial_divisors() {
        Some(divisors) => largest_divisor(spatial, divisors).unwrap_or_else(|| {
            debug!("no spatial divisor of {} in {:?}, using 1", spatial, divisors);
            1
        }),
        None => spatial,
    };
    if constraints.get_force_power_of_two() {
        s = prev_power_of_two(s);
    }

    let element_size = sizing.element_size as f64;
    let mut max_volume = sizing.size_budget as f64 / element_size;
    if let Some(min_chunk_size) = constraints.get_min_chunk_size() {
        max_volume = max_volume.max(min_chunk_size as f64 / element_size);
    }

    let square = |s: Ix| s as f64 * s as f64;
    while s > 1 && square(s) > max_volume {
        s /= 2;
    }
    s = s.min(spatial);
    let mut t = ((max_volume / square(s)) as Ix).clamp(1, outer);
    debug!("symmetrical chunking: {:.1} values per chunk, initial guess [{}, {}, {}]", max_volume, t, s, s);

    while !sizing.fits(&[t, s, s]) {
        if s > 1 {
            s /= 2;
        } else if t > 1 {
            t /= 2;
        } else {
            break;
        }
    }
    debug_assert!(!constraints.get_force_power_of_two() || is_power_of_two(s));

    if let Some(max_chunks) = constraints.get_max_chunks() {
        while t < outer && chunk_count(variable, &[t, s, s]) > max_chunks {
            let grown = (t * 2).min(outer);
            if !sizing.fits(&[grown, s, s]) {
                debug!("cannot satisfy max_chunks={} within {} bytes", max_chunks, sizing.size_budget);
                break;
            }
            t = grown;
        }
    }

    debug!("symmetrical chunk shape for {}: [{}, {}, {}]", variable, t, s, s);
    ChunkShape::from_vec(vec![t, s, s])
}

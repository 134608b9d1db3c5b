//! Chunk-shape suggestions for gridded array variables.
//!
//! This crate computes storage chunk shapes for multi-dimensional variables such
//! as the `[time, lat, lon]` grids found in NetCDF/HDF5 climate and weather
//! archives. Given the extents of a variable, the byte width of its elements and
//! the target byte size of a single chunk, the solvers return a chunk shape that:
//!
//! - never exceeds the byte budget (as long as it holds at least one element),
//! - never exceeds the variable extents along any axis,
//! - optionally honors power-of-two sizes, a set of acceptable spatial chunk
//!   sizes, a maximum chunk count and a minimum chunk byte size.
//!
//! The computation is pure: no I/O, no global state. Applying the resulting
//! shape (e.g. via `nccopy -c`, see [`RechunkPlan`]) is up to the caller.
//!
//! ```
//! use rekx::{Strategy, VariableShape};
//!
//! let variable: VariableShape = "8784,2600,2600".parse()?;
//! let chunk = variable.chunking().solve()?;
//! assert_eq!(chunk.dims(), &[1, 30, 30]);
//!
//! let chunk = variable.chunking().strategy(Strategy::Symmetrical).solve()?;
//! assert_eq!(chunk[1], chunk[2]);
//! # Ok::<(), rekx::Error>(())
//! ```

mod export {
    pub use crate::{
        census::{ChunkCensus, ShapeUsage},
        chunking::{
            solve, solve_constrained, solve_symmetrical, ChunkShapeBuilder, Constraints, Strategy,
            DEFAULT_ELEMENT_SIZE, DEFAULT_SIZE_BUDGET, DEFAULT_SPATIAL_DIVISORS,
        },
        dim::{Dimension, Ix},
        error::{Error, Result},
        rechunk::RechunkPlan,
        shape::{ChunkShape, VariableShape, MAX_NDIM, MIN_NDIM},
    };
}

pub use crate::export::*;

#[macro_use]
mod macros;

mod census;
pub mod chunking;
mod dim;
mod error;
mod rechunk;
mod shape;
mod util;

mod internal_prelude {
    pub use crate::{
        dim::{Dimension, Ix},
        error::{Error, Result},
        shape::{ChunkShape, VariableShape},
        util::{
            chunk_count, chunk_grid, clamp_to_extents, floor_div, is_power_of_two, largest_divisor,
            nbytes, prev_power_of_two, shrink_largest_first, shrink_outer_first, volume,
        },
    };
}

#[cfg(test)]
pub mod test;

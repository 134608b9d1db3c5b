//! Chunk-shape solvers.
//!
//! Three solvers are available, all sharing the same sizing parameters (the
//! byte width of a single element and the byte budget of a single chunk):
//!
//! - [`solve`]: balanced chunk counts per axis, fine-tuned to fill the budget.
//! - [`solve_constrained`]: geometric allocation honoring [`Constraints`].
//! - [`solve_symmetrical`]: `[time, lat, lon]` variables where both spatial
//!   axes get the same chunk size.
//!
//! Constraints are advisory: when `max_chunks` or `min_chunk_size` cannot be
//! met, the solvers return the closest shape they can find without raising an
//! error. The byte budget is always honored as long as it can hold at least a
//! single element.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::debug;

use crate::internal_prelude::*;

mod baseline;
mod constrained;
mod symmetrical;

/// Default byte width of a single element (32-bit float).
pub const DEFAULT_ELEMENT_SIZE: usize = 4;
/// Default byte budget of a single chunk.
pub const DEFAULT_SIZE_BUDGET: usize = 4096;
/// Default set of acceptable spatial chunk sizes: powers of two from 64 to 2048.
pub const DEFAULT_SPATIAL_DIVISORS: [Ix; 6] = [64, 128, 256, 512, 1024, 2048];

/// Element size and chunk byte budget, validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Sizing {
    pub element_size: usize,
    pub size_budget: usize,
}

impl Sizing {
    pub fn new(element_size: usize, size_budget: usize) -> Result<Self> {
        ensure!(element_size > 0, Error::Constraint("element size must be positive".into()));
        ensure!(size_budget > 0, Error::Constraint("chunk size budget must be positive".into()));
        Ok(Self { element_size, size_budget })
    }

    /// Number of elements that fit in the budget (at least one).
    pub fn max_values(&self) -> usize {
        (self.size_budget / self.element_size).max(1)
    }

    pub fn nbytes(&self, chunk: &[Ix]) -> usize {
        nbytes(chunk, self.element_size)
    }

    pub fn fits(&self, chunk: &[Ix]) -> bool {
        self.nbytes(chunk) <= self.size_budget
    }
}

/// Optional constraints for [`solve_constrained`] and [`solve_symmetrical`].
///
/// ```
/// use rekx::Constraints;
///
/// let mut constraints = Constraints::new();
/// constraints.max_chunks(1000).force_power_of_two(true).default_spatial_divisors();
/// assert_eq!(constraints.get_max_chunks(), Some(1000));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constraints {
    max_chunks: Option<usize>,
    min_chunk_size: Option<usize>,
    force_power_of_two: bool,
    spatial_divisors: BTreeSet<Ix>,
}

impl Constraints {
    /// Creates an empty set of constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on the total number of chunks tiling the variable.
    pub fn max_chunks(&mut self, max_chunks: usize) -> &mut Self {
        self.max_chunks = Some(max_chunks);
        self
    }

    /// Lower bound on the byte size of a chunk.
    pub fn min_chunk_size(&mut self, min_chunk_size: usize) -> &mut Self {
        self.min_chunk_size = Some(min_chunk_size);
        self
    }

    /// Round chunk sizes down to powers of two.
    pub fn force_power_of_two(&mut self, force: bool) -> &mut Self {
        self.force_power_of_two = force;
        self
    }

    /// Acceptable chunk sizes for the non-leading (spatial) axes; an empty set
    /// removes the constraint.
    pub fn spatial_divisors<I: IntoIterator<Item = Ix>>(&mut self, divisors: I) -> &mut Self {
        self.spatial_divisors = divisors.into_iter().collect();
        self
    }

    /// Uses [`DEFAULT_SPATIAL_DIVISORS`] for the spatial axes.
    pub fn default_spatial_divisors(&mut self) -> &mut Self {
        self.spatial_divisors(DEFAULT_SPATIAL_DIVISORS)
    }

    pub fn get_max_chunks(&self) -> Option<usize> {
        self.max_chunks
    }

    pub fn get_min_chunk_size(&self) -> Option<usize> {
        self.min_chunk_size
    }

    pub fn get_force_power_of_two(&self) -> bool {
        self.force_power_of_two
    }

    /// Returns the spatial divisors, or `None` if there is no such constraint.
    pub fn get_spatial_divisors(&self) -> Option<&BTreeSet<Ix>> {
        if self.spatial_divisors.is_empty() {
            None
        } else {
            Some(&self.spatial_divisors)
        }
    }

    /// Returns true if no constraint is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_chunks != Some(0),
            Error::Constraint("maximum number of chunks must be positive".into())
        );
        ensure!(
            self.min_chunk_size != Some(0),
            Error::Constraint("minimum chunk size must be positive".into())
        );
        ensure!(
            !self.spatial_divisors.contains(&0),
            Error::Constraint("spatial divisors must be positive".into())
        );
        Ok(())
    }
}

/// Which solver to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// [`solve`]
    #[default]
    Baseline,
    /// [`solve_constrained`]
    Constrained,
    /// [`solve_symmetrical`]
    Symmetrical,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Baseline, Self::Constrained, Self::Symmetrical];

    pub fn name(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Constrained => "constrained",
            Self::Symmetrical => "symmetrical",
        }
    }

    /// Returns true if the strategy takes [`Constraints`] into account.
    pub fn is_constrained(self) -> bool {
        self != Self::Baseline
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" | "suggest" => Ok(Self::Baseline),
            "constrained" | "alternative" => Ok(Self::Constrained),
            "symmetrical" | "alternative-symmetrical" => Ok(Self::Symmetrical),
            _ => Err(Error::Parse(format!("unknown chunking strategy: {:?}", s))),
        }
    }
}

/// Computes a chunk shape for a variable.
///
/// Approximates Russ Rew's "balanced" chunk shape: the number of chunks along
/// each axis is kept roughly equal, with the outermost axis absorbing the
/// imbalance when it is too short to be split. The result is then fine-tuned
/// by trying every `+0/+1` perturbation of the axes and keeping the largest
/// chunk that still fits in `size_budget` bytes.
///
/// ```
/// use rekx::{chunking, VariableShape};
///
/// let variable: VariableShape = "1000,1000,1000".parse().unwrap();
/// let chunk = chunking::solve(&variable, 4, 4096).unwrap();
/// assert_eq!(chunk.dims(), &[1, 32, 32]);
/// ```
pub fn solve(variable: &VariableShape, element_size: usize, size_budget: usize) -> Result<ChunkShape> {
    let sizing = Sizing::new(element_size, size_budget)?;
    Ok(baseline::solve(variable, sizing))
}

/// Computes a chunk shape honoring additional [`Constraints`].
///
/// The target chunk volume is spread geometrically over the axes, rounded to
/// powers of two and/or snapped to the spatial divisors if requested, then
/// shrunk until it fits the budget and finally grown (within the budget) if
/// it produces more than `max_chunks` chunks.
pub fn solve_constrained(
    variable: &VariableShape, element_size: usize, size_budget: usize, constraints: &Constraints,
) -> Result<ChunkShape> {
    let sizing = Sizing::new(element_size, size_budget)?;
    constraints.validate()?;
    Ok(constrained::solve(variable, sizing, constraints))
}

/// Computes a `[time, spatial, spatial]` chunk shape for a 3-D variable.
///
/// Both spatial axes always receive the same chunk size; the outer axis takes
/// whatever is left of the budget.
pub fn solve_symmetrical(
    variable: &VariableShape, element_size: usize, size_budget: usize, constraints: &Constraints,
) -> Result<ChunkShape> {
    ensure!(
        variable.ndim() == 3,
        Error::Shape(format!(
            "symmetrical chunking requires exactly 3 axes, got variable shape {}",
            variable
        ))
    );
    let sizing = Sizing::new(element_size, size_budget)?;
    constraints.validate()?;
    Ok(symmetrical::solve(variable, sizing, constraints))
}

/// Builder used to compute a chunk shape for a variable.
///
/// ```
/// use rekx::{Strategy, VariableShape};
///
/// let variable = VariableShape::new([100, 2048, 4096]).unwrap();
/// let chunk = variable
///     .chunking()
///     .strategy(Strategy::Symmetrical)
///     .force_power_of_two(true)
///     .default_spatial_divisors()
///     .solve()
///     .unwrap();
/// assert_eq!(chunk.dims(), &[1, 32, 32]);
/// ```
#[derive(Clone, Debug)]
pub struct ChunkShapeBuilder {
    variable: VariableShape,
    element_size: usize,
    size_budget: usize,
    constraints: Constraints,
    strategy: Strategy,
}

impl ChunkShapeBuilder {
    pub fn new(variable: &VariableShape) -> Self {
        Self {
            variable: variable.clone(),
            element_size: DEFAULT_ELEMENT_SIZE,
            size_budget: DEFAULT_SIZE_BUDGET,
            constraints: Constraints::default(),
            strategy: Strategy::default(),
        }
    }

    /// Byte width of a single element (default: 4).
    pub fn element_size(&mut self, element_size: usize) -> &mut Self {
        self.element_size = element_size;
        self
    }

    /// Byte budget of a single chunk (default: 4096).
    pub fn size_budget(&mut self, size_budget: usize) -> &mut Self {
        self.size_budget = size_budget;
        self
    }

    pub fn strategy(&mut self, strategy: Strategy) -> &mut Self {
        self.strategy = strategy;
        self
    }

    /// Replaces all constraints at once.
    pub fn constraints(&mut self, constraints: &Constraints) -> &mut Self {
        self.constraints = constraints.clone();
        self
    }

    pub fn max_chunks(&mut self, max_chunks: usize) -> &mut Self {
        self.constraints.max_chunks(max_chunks);
        self
    }

    pub fn min_chunk_size(&mut self, min_chunk_size: usize) -> &mut Self {
        self.constraints.min_chunk_size(min_chunk_size);
        self
    }

    pub fn force_power_of_two(&mut self, force: bool) -> &mut Self {
        self.constraints.force_power_of_two(force);
        self
    }

    pub fn spatial_divisors<I: IntoIterator<Item = Ix>>(&mut self, divisors: I) -> &mut Self {
        self.constraints.spatial_divisors(divisors);
        self
    }

    pub fn default_spatial_divisors(&mut self) -> &mut Self {
        self.constraints.default_spatial_divisors();
        self
    }

    pub fn solve(&self) -> Result<ChunkShape> {
        let (variable, constraints) = (&self.variable, &self.constraints);
        match self.strategy {
            Strategy::Baseline => {
                if !constraints.is_empty() {
                    debug!("baseline chunking ignores constraints {:?}", constraints);
                }
                solve(variable, self.element_size, self.size_budget)
            }
            Strategy::Constrained => {
                solve_constrained(variable, self.element_size, self.size_budget, constraints)
            }
            Strategy::Symmetrical => {
                solve_symmetrical(variable, self.element_size, self.size_budget, constraints)
            }
        }
    }
}

impl VariableShape {
    /// Returns a builder for computing a chunk shape of this variable.
    pub fn chunking(&self) -> ChunkShapeBuilder {
        ChunkShapeBuilder::new(self)
    }
}

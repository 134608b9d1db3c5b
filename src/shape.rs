use std::fmt::{self, Debug, Display};
use std::ops::Deref;
use std::str::FromStr;

use crate::internal_prelude::*;

/// Smallest number of axes a variable may have.
pub const MIN_NDIM: usize = 2;
/// Largest number of axes a variable may have.
pub const MAX_NDIM: usize = 4;

fn parse_dims(s: &str) -> Result<Vec<Ix>> {
    s.split(',')
        .map(|token| -> Result<Ix> {
            let token = token.trim();
            ensure!(!token.is_empty(), Error::Parse(format!("empty entry in {:?}", s)));
            Ok(token.parse::<Ix>()?)
        })
        .collect()
}

fn fmt_dims(dims: &[Ix], f: &mut fmt::Formatter) -> fmt::Result {
    if dims.len() == 1 {
        write!(f, "({},)", dims[0])
    } else {
        let dims = dims.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        write!(f, "({})", dims)
    }
}

/// Shape of a gridded variable, in storage order (outermost axis first).
///
/// A variable shape always has between 2 and 4 axes, each of them non-empty.
/// It can be built from anything that implements [`Dimension`] or parsed from
/// a comma-separated list:
///
/// ```
/// use rekx::VariableShape;
///
/// let shape: VariableShape = "8784, 2600, 2600".parse().unwrap();
/// assert_eq!(shape, VariableShape::new((8784, 2600, 2600)).unwrap());
/// assert_eq!(shape.to_string(), "(8784, 2600, 2600)");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VariableShape {
    dims: Vec<Ix>,
}

impl VariableShape {
    pub fn new<D: Dimension>(dims: D) -> Result<Self> {
        let dims = dims.dims();
        ensure!(
            (MIN_NDIM..=MAX_NDIM).contains(&dims.len()),
            Error::Shape(format!(
                "expected {} to {} axes, got {}",
                MIN_NDIM,
                MAX_NDIM,
                dims.len()
            ))
        );
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            fail!(Error::Shape(format!("axis {} of variable shape {:?} is empty", axis, dims)));
        }
        Ok(Self { dims })
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[Ix] {
        &self.dims
    }

    /// Total number of elements (saturating).
    pub fn size(&self) -> usize {
        self.dims.iter().fold(1, |acc: usize, &d| acc.saturating_mul(d))
    }

    /// Total byte size of the variable (saturating).
    pub fn nbytes(&self, element_size: usize) -> usize {
        nbytes(&self.dims, element_size)
    }
}

impl Deref for VariableShape {
    type Target = [Ix];

    fn deref(&self) -> &Self::Target {
        &self.dims
    }
}

impl Dimension for VariableShape {
    fn ndim(&self) -> usize {
        self.dims.len()
    }

    fn dims(&self) -> Vec<Ix> {
        self.dims.clone()
    }
}

impl FromStr for VariableShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(parse_dims(s)?)
    }
}

impl TryFrom<Vec<Ix>> for VariableShape {
    type Error = Error;

    fn try_from(dims: Vec<Ix>) -> Result<Self> {
        Self::new(dims)
    }
}

impl TryFrom<&[Ix]> for VariableShape {
    type Error = Error;

    fn try_from(dims: &[Ix]) -> Result<Self> {
        Self::new(dims)
    }
}

impl Debug for VariableShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VariableShape{}", self)
    }
}

impl Display for VariableShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_dims(&self.dims, f)
    }
}

/// Block shape used to tile a variable on storage.
///
/// Chunk shapes returned by the solvers always have the same number of axes
/// as the variable and never exceed its extents. Chunk shapes built by hand
/// (e.g. shapes observed in existing files) only need non-empty axes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkShape(Vec<Ix>);

impl ChunkShape {
    pub fn new<D: Dimension>(dims: D) -> Result<Self> {
        let dims = dims.dims();
        ensure!(!dims.is_empty(), Error::Shape("chunk shape has no axes".into()));
        ensure!(
            dims.iter().all(|&d| d > 0),
            Error::Shape(format!("chunk shape {:?} has an empty axis", dims))
        );
        Ok(Self(dims))
    }

    pub(crate) fn from_vec(dims: Vec<Ix>) -> Self {
        debug_assert!(dims.iter().all(|&d| d > 0));
        Self(dims)
    }

    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    pub fn dims(&self) -> &[Ix] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Ix> {
        self.0
    }

    /// Number of elements in a single chunk.
    pub fn volume(&self) -> usize {
        volume(&self.0)
    }

    /// Byte size of a single chunk.
    pub fn nbytes(&self, element_size: usize) -> usize {
        nbytes(&self.0, element_size)
    }

    fn ensure_same_ndim(&self, variable: &VariableShape) -> Result<()> {
        ensure!(
            self.ndim() == variable.ndim(),
            Error::Shape(format!(
                "chunk shape {} doesn't match the rank of variable shape {}",
                self, variable
            ))
        );
        Ok(())
    }

    /// Returns true if every axis is within the corresponding variable extent.
    pub fn fits(&self, variable: &VariableShape) -> bool {
        self.ndim() == variable.ndim() && self.0.iter().zip(variable.iter()).all(|(c, d)| c <= d)
    }

    /// Number of chunks along each axis needed to tile the variable.
    pub fn grid(&self, variable: &VariableShape) -> Result<Vec<Ix>> {
        self.ensure_same_ndim(variable)?;
        Ok(chunk_grid(variable, &self.0))
    }

    /// Total number of chunks needed to tile the variable.
    pub fn count(&self, variable: &VariableShape) -> Result<usize> {
        self.ensure_same_ndim(variable)?;
        Ok(chunk_count(variable, &self.0))
    }

    /// Number of elements allocated in edge chunks beyond the variable extents.
    pub fn padding(&self, variable: &VariableShape) -> Result<usize> {
        let allocated = self.count(variable)?.saturating_mul(self.volume());
        Ok(allocated.saturating_sub(variable.size()))
    }
}

impl Deref for ChunkShape {
    type Target = [Ix];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Dimension for ChunkShape {
    fn ndim(&self) -> usize {
        self.0.len()
    }

    fn dims(&self) -> Vec<Ix> {
        self.0.clone()
    }
}

impl FromStr for ChunkShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(parse_dims(s)?)
    }
}

impl TryFrom<Vec<Ix>> for ChunkShape {
    type Error = Error;

    fn try_from(dims: Vec<Ix>) -> Result<Self> {
        Self::new(dims)
    }
}

impl From<ChunkShape> for Vec<Ix> {
    fn from(shape: ChunkShape) -> Self {
        shape.0
    }
}

impl From<&ChunkShape> for ndarray::IxDyn {
    fn from(shape: &ChunkShape) -> Self {
        ndarray::IxDyn(&shape.0)
    }
}

impl PartialEq<[Ix]> for ChunkShape {
    fn eq(&self, other: &[Ix]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[Ix; N]> for ChunkShape {
    fn eq(&self, other: &[Ix; N]) -> bool {
        self.0 == other
    }
}

impl Debug for ChunkShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ChunkShape{}", self)
    }
}

impl Display for ChunkShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_dims(&self.0, f)
    }
}

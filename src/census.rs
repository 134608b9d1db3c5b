use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::internal_prelude::*;

/// Files in which a variable was observed with a given chunk shape.
pub type ShapeUsage = BTreeMap<ChunkShape, BTreeSet<String>>;

/// Chunk shapes observed for each variable across a collection of files.
///
/// Used to verify that a set of files shares a uniform chunking layout before
/// building reference indices over them, and to derive a common chunk shape
/// to rechunk the odd ones out to.
///
/// ```
/// use rekx::{ChunkCensus, ChunkShape};
///
/// let mut census = ChunkCensus::new();
/// census.record("SIS", "2020.nc", ChunkShape::new([1, 32, 32]).unwrap());
/// census.record("SIS", "2021.nc", ChunkShape::new([1, 64, 64]).unwrap());
/// assert!(!census.is_consistent());
/// assert_eq!(census.common_shapes().unwrap()["SIS"], [1, 64, 64]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkCensus {
    variables: BTreeMap<String, ShapeUsage>,
}

impl ChunkCensus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `variable` is chunked as `chunk` in `file`.
    pub fn record(&mut self, variable: &str, file: &str, chunk: ChunkShape) -> &mut Self {
        self.variables
            .entry(variable.to_owned())
            .or_default()
            .entry(chunk)
            .or_default()
            .insert(file.to_owned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn shapes(&self, variable: &str) -> Option<&ShapeUsage> {
        self.variables.get(variable)
    }

    /// Returns true if every variable was observed with a single chunk shape.
    pub fn is_consistent(&self) -> bool {
        self.variables.values().all(|usage| usage.len() <= 1)
    }

    /// Variables observed with more than one chunk shape.
    pub fn inconsistent(&self) -> BTreeMap<&str, &ShapeUsage> {
        self.variables
            .iter()
            .filter(|(_, usage)| usage.len() > 1)
            .map(|(name, usage)| (name.as_str(), usage))
            .collect()
    }

    /// Element-wise maximum of the observed chunk shapes, per variable.
    pub fn common_shapes(&self) -> Result<BTreeMap<&str, ChunkShape>> {
        let mut common = BTreeMap::new();
        for (name, usage) in &self.variables {
            let mut shapes = usage.keys();
            let Some(first) = shapes.next() else {
                continue;
            };
            let mut dims = first.dims().to_vec();
            for shape in shapes {
                ensure!(
                    shape.ndim() == dims.len(),
                    Error::Shape(format!(
                        "variable {:?} has chunk shapes of different rank: {} and {}",
                        name, first, shape
                    ))
                );
                for (d, &s) in dims.iter_mut().zip(shape.iter()) {
                    *d = (*d).max(s);
                }
            }
            if usage.len() > 1 {
                debug!("common chunk shape for {:?} over {} shapes: {:?}", name, usage.len(), dims);
            }
            common.insert(name.as_str(), ChunkShape::from_vec(dims));
        }
        Ok(common)
    }
}

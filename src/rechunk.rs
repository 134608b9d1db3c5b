use std::collections::HashSet;
use std::fmt::{self, Display};

use crate::internal_prelude::*;

/// A chunk shape attached to named dimensions, ready to be handed to a
/// rechunking backend.
///
/// ```
/// use rekx::{ChunkShape, RechunkPlan};
///
/// let chunk = ChunkShape::new([1, 32, 32]).unwrap();
/// let plan = RechunkPlan::new(&["time", "lat", "lon"], chunk).unwrap();
/// assert_eq!(plan.nccopy_chunking(), "time/1,lat/32,lon/32");
/// assert_eq!(plan.get("lat"), Some(32));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RechunkPlan {
    names: Vec<String>,
    chunk: ChunkShape,
}

impl RechunkPlan {
    pub fn new<S: AsRef<str>>(names: &[S], chunk: ChunkShape) -> Result<Self> {
        ensure!(
            names.len() == chunk.ndim(),
            Error::Shape(format!(
                "got {} dimension names for chunk shape {}",
                names.len(),
                chunk
            ))
        );
        let mut seen = HashSet::new();
        let mut owned = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            ensure!(!name.is_empty(), Error::Shape("dimension name is empty".into()));
            ensure!(seen.insert(name), Error::Shape(format!("duplicate dimension name: {:?}", name)));
            owned.push(name.to_owned());
        }
        Ok(Self { names: owned, chunk })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn chunk_shape(&self) -> &ChunkShape {
        &self.chunk
    }

    /// Chunk size along the named dimension.
    pub fn get(&self, name: &str) -> Option<Ix> {
        self.names.iter().position(|n| n == name).map(|i| self.chunk[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Ix)> + '_ {
        self.names.iter().map(String::as_str).zip(self.chunk.iter().copied())
    }

    /// Chunking argument in `nccopy -c` form, e.g. `time/1,lat/32,lon/32`.
    pub fn nccopy_chunking(&self) -> String {
        self.iter().map(|(name, size)| format!("{}/{}", name, size)).collect::<Vec<_>>().join(",")
    }
}

impl Display for RechunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.nccopy_chunking())
    }
}

#[cfg(test)]
pub mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    pub fn test_rechunk_plan() {
        let chunk = ChunkShape::new([1, 30, 30]).unwrap();
        let plan = RechunkPlan::new(&["time", " lat ", "lon"], chunk.clone()).unwrap();
        assert_eq!(plan.names(), &["time", "lat", "lon"]);
        assert_eq!(plan.chunk_shape(), &chunk);
        assert_eq!(plan.get("time"), Some(1));
        assert_eq!(plan.get("lon"), Some(30));
        assert_eq!(plan.get("depth"), None);
        assert_eq!(plan.iter().collect::<Vec<_>>(), vec![("time", 1), ("lat", 30), ("lon", 30)]);
        assert_eq!(plan.to_string(), "time/1,lat/30,lon/30");

        let names = vec!["x".to_owned(), "y".to_owned()];
        let plan = RechunkPlan::new(&names, ChunkShape::new([3, 1]).unwrap()).unwrap();
        assert_eq!(plan.nccopy_chunking(), "x/3,y/1");
    }

    #[test]
    pub fn test_rechunk_plan_invalid() {
        let chunk = ChunkShape::new([1, 32, 32]).unwrap();
        assert_err_re!(
            RechunkPlan::new(&["lat", "lon"], chunk.clone()),
            r"^shape error: got 2 dimension names for chunk shape \(1, 32, 32\)$"
        );
        assert_err_re!(RechunkPlan::new(&["time", "", "lon"], chunk.clone()), "name is empty");
        assert_err_re!(
            RechunkPlan::new(&["time", "lat", "lat"], chunk),
            "duplicate dimension name: \"lat\""
        );
    }
}

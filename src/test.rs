use quickcheck::{Arbitrary, Gen};

use crate::internal_prelude::*;
use crate::Constraints;

fn gen_extent(g: &mut Gen) -> Ix {
    if bool::arbitrary(g) {
        (u8::arbitrary(g) % 16 + 1) as Ix
    } else {
        (u32::arbitrary(g) % 10_000 + 1) as Ix
    }
}

fn gen_shape(g: &mut Gen, ndim: usize) -> VariableShape {
    let dims = (0..ndim).map(|_| gen_extent(g)).collect::<Vec<_>>();
    VariableShape::new(dims).unwrap()
}

impl Arbitrary for VariableShape {
    fn arbitrary(g: &mut Gen) -> Self {
        let ndim = *g.choose(&[2, 3, 4]).unwrap();
        gen_shape(g, ndim)
    }
}

/// A 3-D variable shape.
#[derive(Clone, Debug)]
pub struct Shape3(pub VariableShape);

impl Arbitrary for Shape3 {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(gen_shape(g, 3))
    }
}

/// Element size and a budget of `element_size << shift` bytes.
#[derive(Clone, Copy, Debug)]
pub struct SizeGen {
    pub element_size: usize,
    pub shift: u32,
}

impl SizeGen {
    pub fn size_budget(&self) -> usize {
        self.element_size << self.shift
    }
}

impl Arbitrary for SizeGen {
    fn arbitrary(g: &mut Gen) -> Self {
        let element_size = *g.choose(&[1, 2, 4, 8]).unwrap();
        Self { element_size, shift: u32::arbitrary(g) % 20 }
    }
}

impl Arbitrary for Constraints {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut constraints = Self::new();
        if bool::arbitrary(g) {
            constraints.max_chunks((u32::arbitrary(g) % 1_000_000 + 1) as usize);
        }
        if bool::arbitrary(g) {
            constraints.min_chunk_size((u32::arbitrary(g) % (1 << 20) + 1) as usize);
        }
        constraints.force_power_of_two(bool::arbitrary(g));
        match u8::arbitrary(g) % 3 {
            0 => {}
            1 => {
                constraints.default_spatial_divisors();
            }
            _ => {
                let n = u8::arbitrary(g) % 4 + 1;
                constraints.spatial_divisors((0..n).map(|_| (u16::arbitrary(g) % 4096 + 1) as Ix));
            }
        }
        constraints
    }
}

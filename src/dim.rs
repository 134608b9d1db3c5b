use ndarray::Dimension as NdDimension;

/// A scalar integer type used by `Dimension` trait for indexing.
pub type Ix = usize;

/// A trait for anything that describes the extents of an array.
///
/// Implemented for slices, vectors, fixed-size arrays and tuples of `Ix`, as
/// well as for `ndarray` dimension types, so that shapes can be passed in
/// whatever form the caller already holds.
pub trait Dimension {
    fn ndim(&self) -> usize;

    fn dims(&self) -> Vec<Ix>;

    fn size(&self) -> Ix {
        let dims = self.dims();
        if dims.is_empty() {
            1
        } else {
            dims.iter().product()
        }
    }
}

impl<'a, T: Dimension + ?Sized> Dimension for &'a T {
    fn ndim(&self) -> usize {
        Dimension::ndim(*self)
    }

    fn dims(&self) -> Vec<Ix> {
        Dimension::dims(*self)
    }
}

impl Dimension for [Ix] {
    fn ndim(&self) -> usize {
        self.len()
    }

    fn dims(&self) -> Vec<Ix> {
        self.to_vec()
    }
}

impl Dimension for Vec<Ix> {
    fn ndim(&self) -> usize {
        self.len()
    }

    fn dims(&self) -> Vec<Ix> {
        self.clone()
    }
}

impl<const N: usize> Dimension for [Ix; N] {
    fn ndim(&self) -> usize {
        N
    }

    fn dims(&self) -> Vec<Ix> {
        self.to_vec()
    }
}

impl Dimension for () {
    fn ndim(&self) -> usize {
        0
    }

    fn dims(&self) -> Vec<Ix> {
        vec![]
    }
}

impl Dimension for Ix {
    fn ndim(&self) -> usize {
        1
    }

    fn dims(&self) -> Vec<Ix> {
        vec![*self]
    }
}

macro_rules! impl_tuple {
    (@ix $name:ident) => { Ix };
    ($n:expr; $($name:ident),+) => {
        impl Dimension for ($(impl_tuple!(@ix $name),)+) {
            #[inline]
            fn ndim(&self) -> usize {
                $n
            }

            #[inline]
            #[allow(non_snake_case)]
            fn dims(&self) -> Vec<Ix> {
                let ($($name,)+) = *self;
                vec![$($name),+]
            }
        }
    };
}

impl_tuple!(1; A);
impl_tuple!(2; A, B);
impl_tuple!(3; A, B, C);
impl_tuple!(4; A, B, C, D);
impl_tuple!(5; A, B, C, D, E);
impl_tuple!(6; A, B, C, D, E, F);

macro_rules! impl_ndarray {
    ($($tp:ty),+) => {
        $(
            impl Dimension for $tp {
                fn ndim(&self) -> usize {
                    NdDimension::ndim(self)
                }

                fn dims(&self) -> Vec<Ix> {
                    self.slice().to_vec()
                }
            }
        )+
    };
}

impl_ndarray!(ndarray::Ix1, ndarray::Ix2, ndarray::Ix3, ndarray::Ix4, ndarray::Ix5, ndarray::IxDyn);

use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::num::ParseIntError;

use ndarray::ShapeError;

/// The error type for chunk-shape computations.
///
/// All errors are raised synchronously while validating the inputs; once the
/// inputs are valid, the solvers always produce a shape.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// The variable or chunk shape is malformed (wrong arity, zero extents,
    /// shapes that don't line up with each other).
    Shape(String),
    /// A comma-separated shape string could not be parsed.
    Parse(String),
    /// A sizing parameter or optimization constraint is out of range.
    Constraint(String),
    /// A user error that doesn't fall into any of the categories above.
    Internal(String),
}

/// A type for results generated by `rekx` functions where the `Err` type is
/// set to `rekx::Error`.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;

impl Error {
    /// Returns the bare message without the category prefix.
    pub fn description(&self) -> &str {
        match *self {
            Self::Shape(ref desc)
            | Self::Parse(ref desc)
            | Self::Constraint(ref desc)
            | Self::Internal(ref desc) => desc,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(*self, Self::Shape(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(*self, Self::Parse(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(*self, Self::Constraint(_))
    }
}

impl From<&str> for Error {
    fn from(desc: &str) -> Self {
        Self::Internal(desc.into())
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Self::Internal(desc)
    }
}

impl From<Infallible> for Error {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

impl From<ParseIntError> for Error {
    fn from(err: ParseIntError) -> Self {
        Self::Parse(format!("invalid integer in the list: {err}"))
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Self::Shape(format!("ndarray shape error: {err}"))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Shape(ref desc) => write!(f, "shape error: {desc}"),
            Self::Parse(ref desc) => write!(f, "parse error: {desc}"),
            Self::Constraint(ref desc) => write!(f, "constraint error: {desc}"),
            Self::Internal(ref desc) => f.write_str(desc),
        }
    }
}

impl StdError for Error {}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        Self::new(io::ErrorKind::InvalidInput, err)
    }
}

#[cfg(test)]
pub mod tests {
    use std::io;

    use ndarray::{ErrorKind, ShapeError};

    use super::{Error, Result};

    #[test]
    pub fn test_display() {
        let err = Error::Shape("expected 2 to 4 axes, got 5".into());
        assert_eq!(err.to_string(), "shape error: expected 2 to 4 axes, got 5");
        assert_eq!(err.description(), "expected 2 to 4 axes, got 5");
        assert!(err.is_shape());
        assert!(!err.is_parse());

        let err = Error::Constraint("element size must be positive".into());
        assert_eq!(format!("{:?}", err), "constraint error: element size must be positive");
        assert!(err.is_constraint());

        let err: Error = "something odd".into();
        assert_eq!(err, Error::Internal("something odd".to_owned()));
        assert_eq!(err.to_string(), "something odd");
    }

    #[test]
    pub fn test_conversions() {
        let err: Error = "1x".parse::<usize>().unwrap_err().into();
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "parse error: invalid integer in the list: invalid digit found in string");

        let err: Error = ShapeError::from_kind(ErrorKind::IncompatibleShape).into();
        assert!(err.is_shape());

        let err: io::Error = Error::Shape("bad".into()).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    pub fn test_fail_ensure() {
        fn f(value: usize) -> Result<usize> {
            ensure!(value > 0, Error::Constraint("value must be positive".into()));
            ensure!(value < 10, "value {} is too large", value);
            if value == 5 {
                fail!("five is not allowed");
            }
            Ok(value)
        }

        assert_eq!(f(1).unwrap(), 1);
        assert_err_re!(f(0), "^constraint error: value must be positive$");
        assert_err_re!(f(10), "^value 10 is too large$");
        assert_err_re!(f(5), "five");
    }
}

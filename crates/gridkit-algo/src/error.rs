use thiserror::Error;

/// Errors from the matrix routines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Index {index} out of range for dimension {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Matrix is singular")]
    Singular,

    #[error(
        "Iterative solve for column {column} did not converge after {iterations} iterations \
         (relative residual {residual:.3e})"
    )]
    Convergence {
        column: usize,
        residual: f64,
        iterations: usize,
    },

    #[error("Slice {slice} has no non-NaN values to interpolate from")]
    InsufficientKnots { slice: usize },
}

impl LinalgError {
    /// True for errors caused by the caller's arguments rather than the
    /// numerics (shape, index, axis).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LinalgError::InvalidArgument(_)
                | LinalgError::NotSquare { .. }
                | LinalgError::IndexOutOfRange { .. }
        )
    }
}

pub type LinalgResult<T> = Result<T, LinalgError>;

/// Fail unless `shape` is square with `index` inside it.
pub(crate) fn check_square_index(shape: (usize, usize), index: usize) -> LinalgResult<usize> {
    let (rows, cols) = shape;
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(LinalgError::InvalidArgument("matrix is empty".into()));
    }
    if index >= rows {
        return Err(LinalgError::IndexOutOfRange { index, size: rows });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_square_index() {
        assert_eq!(check_square_index((3, 3), 2), Ok(3));
        assert_eq!(
            check_square_index((3, 2), 0),
            Err(LinalgError::NotSquare { rows: 3, cols: 2 })
        );
        assert_eq!(
            check_square_index((3, 3), 3),
            Err(LinalgError::IndexOutOfRange { index: 3, size: 3 })
        );
        assert!(check_square_index((0, 0), 0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_convergence_display() {
        let err = LinalgError::Convergence {
            column: 4,
            residual: 1.5e-3,
            iterations: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("column 4"));
        assert!(msg.contains("1.500e-3"));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_insufficient_knots_display() {
        let msg = LinalgError::InsufficientKnots { slice: 2 }.to_string();
        assert_eq!(msg, "Slice 2 has no non-NaN values to interpolate from");
    }
}

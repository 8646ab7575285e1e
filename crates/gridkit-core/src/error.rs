//! Unified error type for grid construction and ingestion.
//!
//! Numerical routines in `gridkit-algo` carry their own `LinalgError`;
//! everything that touches the network graph reports a [`GridError`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network structure errors (missing bus, missing position, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Caller passed an argument outside the accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::Network("bus 7 has no position".into());
        assert!(err.to_string().contains("Network error"));
        assert!(err.to_string().contains("bus 7"));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> GridResult<()> {
            Err(GridError::InvalidArgument("n must be positive".into()))
        }

        fn outer() -> GridResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(GridError::InvalidArgument(_))));
    }
}

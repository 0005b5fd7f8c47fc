//! Errors raised at the matrix boundary.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// The supplied matrix failed structural validation.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Derived data was requested before a ground-truth matrix was set
    /// (or before the remaining matrices were derived).
    #[error("definition of matrices is not complete")]
    IncompleteDefinition,
}

pub type Result<T> = std::result::Result<T, MatrixError>;

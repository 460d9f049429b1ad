use thiserror::Error;

pub type Result<T> = std::result::Result<T, MultiviewError>;

/// Errors raised when assembling or constructing multi-view data.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MultiviewError {
    #[error("a view set must contain at least one view")]
    EmptyViewSet,
    #[error("view {view} has {actual} samples, but view 0 has {expected}")]
    SampleCountMismatch {
        view: usize,
        expected: usize,
        actual: usize,
    },
    #[error("view {0} contains NaN or infinite values")]
    NonFiniteData(usize),
    #[error("number of views must be positive")]
    NoViews,
    #[error("precision parameter must be in the interval (0; 1)")]
    InvalidPrecision,
    #[error("target dimension of the projection must be positive")]
    NonPositiveEmbeddingSize,
    #[error("target dimension {0} is larger than the number of features {1}")]
    DimensionIncrease(usize, usize),
    #[error(transparent)]
    NdarrayRandError(#[from] ndarray_rand::rand_distr::NormalError),
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
}

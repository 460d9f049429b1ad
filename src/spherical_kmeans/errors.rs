use thiserror::Error;

use crate::error::MultiviewError;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum MultiviewKMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("tolerance cannot be negative")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when fitting or predicting with multi-view spherical K-means
#[derive(Error, Debug)]
pub enum MultiviewKMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] MultiviewKMeansParamsError),
    /// When the view set itself is malformed
    #[error(transparent)]
    InvalidData(#[from] MultiviewError),
    /// When more clusters are requested than there are samples
    #[error("n_clusters {n_clusters} exceeds the number of samples {n_samples}")]
    TooManyClusters { n_clusters: usize, n_samples: usize },
    /// When the number of views disagrees with the fitted model or the
    /// precomputed centroids
    #[error("expected {expected} views, got {actual}")]
    ViewCountMismatch { expected: usize, actual: usize },
    /// When a view's feature dimension disagrees with the fitted model or
    /// the precomputed centroids
    #[error("view {view} has {actual} features, but {expected} were expected")]
    DimensionMismatch {
        view: usize,
        expected: usize,
        actual: usize,
    },
    /// When precomputed centroids do not contain one row per cluster
    #[error("precomputed centroids have {actual} rows, but n_clusters is {expected}")]
    PrecomputedClusterMismatch { expected: usize, actual: usize },
    /// When inertia computation fails
    #[error("Fitting failed: No inertia improvement (-inf)")]
    InertiaError,
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
}

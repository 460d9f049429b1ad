//! `linfa-multiview` provides pure Rust building blocks for multi-view
//! machine learning: learning from several feature matrices ("views") that
//! describe the same set of samples.
//!
//! ## The big picture
//!
//! `linfa-multiview` is a crate in the `linfa` ecosystem, a wider effort to
//! bootstrap a toolkit for classical Machine Learning implemented in pure
//! Rust, kin in spirit to Python's `scikit-learn`.
//!
//! ## Current state
//!
//! Right now `linfa-multiview` provides:
//! * [Multi-view spherical K-means](MultiviewKMeans): a joint clustering
//!   procedure over views of unit-norm vectors sharing one cluster
//!   assignment per sample
//! * [Random Gaussian projection](random_gaussian_projection) for
//!   constructing a set of views from a single data matrix
//! * [Von Mises-Fisher sampling](sample_vmf) for generating synthetic
//!   directional data
//! * [Normalized mutual information](NormalizedMutualInfo) for scoring a
//!   clustering against reference labels
//!
//! Implementation choices and algorithmic details are documented on the
//! items themselves.
mod construct;
mod error;
mod generate;
mod metrics;
mod spherical_kmeans;
mod view_set;

pub use construct::*;
pub use error::*;
pub use generate::*;
pub use metrics::*;
pub use spherical_kmeans::*;
pub use view_set::*;

//! # View construction
//!
//! Multi-view algorithms need several views of the same samples, but many
//! datasets come as a single matrix. Random Gaussian projections build a
//! view set from one matrix by projecting the data onto independently
//! drawn random subspaces, following the
//! [Johnson-Lindenstrauss Lemma](https://en.wikipedia.org/wiki/Johnson%E2%80%93Lindenstrauss_lemma):
//! if the dimension of the embedding is `Ω(log(n_samples)/eps^2)`, then
//! with high probability each projection has distortion less than `eps`.
//! Because the projection matrices are independent, the resulting views
//! carry complementary low-distortion pictures of the same data.
use linfa::Float;
use ndarray::{Array, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Distribution, Normal, StandardNormal};
use ndarray_rand::RandomExt;

use crate::error::{MultiviewError, Result};
use crate::view_set::ViewSet;

/// Target dimensionality of the constructed views.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectionDim {
    /// Project every view to this many components.
    Fixed(usize),
    /// Derive the dimension from the desired distortion `eps` with the
    /// Johnson-Lindenstrauss lemma. The lemma makes a very conservative
    /// estimate, so the resulting dimension can be large.
    Auto { eps: f64 },
}

/// Construct `n_views` views of `x` by random Gaussian projection.
///
/// Each view is obtained by multiplying `x` with its own projection
/// matrix, whose entries are drawn i.i.d. from `N(0, 1/target_dim)`. All
/// matrices are drawn from the single `rng`, so one seed reproduces the
/// whole view set.
///
/// Fails if `n_views` is zero, if the precision parameter lies outside
/// `(0, 1)`, if the target dimension is zero, or if the target dimension
/// exceeds the number of features of `x`.
pub fn random_gaussian_projection<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    n_views: usize,
    dim: ProjectionDim,
    rng: &mut impl Rng,
) -> Result<ViewSet<F>>
where
    StandardNormal: Distribution<F>,
{
    if n_views == 0 {
        return Err(MultiviewError::NoViews);
    }
    let (n_samples, n_features) = x.dim();
    let n_dims = match dim {
        ProjectionDim::Fixed(0) => return Err(MultiviewError::NonPositiveEmbeddingSize),
        ProjectionDim::Fixed(target_dim) => target_dim,
        ProjectionDim::Auto { eps } => {
            if eps <= 0. || eps >= 1. {
                return Err(MultiviewError::InvalidPrecision);
            }
            johnson_lindenstrauss_min_dim(n_samples, eps)
        }
    };
    if n_dims > n_features {
        return Err(MultiviewError::DimensionIncrease(n_dims, n_features));
    }

    let std_dev = F::cast(n_dims).sqrt().recip();
    let gaussian = Normal::new(F::zero(), std_dev)?;

    let views = (0..n_views)
        .map(|_| {
            let projection: Array2<F> =
                Array::random_using((n_features, n_dims), gaussian, rng);
            x.dot(&projection)
        })
        .collect();
    ViewSet::new(views)
}

/// Compute a safe dimension for a projection with precision `eps`, using
/// the Johnson-Lindenstrauss Lemma.
///
/// References:
/// - [D. Achlioptas, JCSS](https://www.sciencedirect.com/science/article/pii/S0022000003000254)
/// - [Li et al., SIGKDD'06](https://hastie.su.domains/Papers/Ping/KDD06_rp.pdf)
pub fn johnson_lindenstrauss_min_dim(n_samples: usize, eps: f64) -> usize {
    let log_samples = (n_samples as f64).ln();
    let value = 4. * log_samples / (eps.powi(2) / 2. - eps.powi(3) / 3.);
    value as usize
}

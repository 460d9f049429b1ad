use linfa::prelude::*;
use linfa::Float;
use ndarray_rand::rand::Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::init::MultiviewKMeansInit;
use super::MultiviewKMeansParamsError;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [multi-view spherical K-means algorithm](crate::MultiviewKMeans).
pub struct MultiviewKMeansValidParams<F: Float, R: Rng> {
    /// Number of times the algorithm is restarted from a fresh random
    /// initialization; the restart with the lowest final inertia wins.
    n_runs: usize,
    /// A restart is considered converged when the summed squared
    /// displacement of all per-view centroids between two consecutive
    /// iterations is lower or equal than `tolerance`.
    tolerance: F,
    /// We exit the iteration loop of a restart when the number of
    /// iterations exceeds `max_n_iterations` even if the `tolerance`
    /// convergence condition has not been met.
    max_n_iterations: u64,
    /// The number of clusters we will be looking for in the training data.
    n_clusters: usize,
    /// The initialization strategy used to seed the centroids.
    init: MultiviewKMeansInit<F>,
    /// The random number generator
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// A helper struct used to construct a set of [valid
/// hyperparameters](MultiviewKMeansValidParams) for the [multi-view
/// spherical K-means algorithm](crate::MultiviewKMeans) (using the builder
/// pattern).
pub struct MultiviewKMeansParams<F: Float, R: Rng>(MultiviewKMeansValidParams<F, R>);

impl<F: Float, R: Rng> MultiviewKMeansParams<F, R> {
    /// `new` lets us configure our training algorithm parameters:
    /// * we will be looking for `n_clusters` in the training data;
    /// * a restart is considered complete if the summed squared centroid
    ///   displacement after a training iteration is lower or equal than
    ///   `tolerance`;
    /// * we exit the training loop of a restart when the number of
    ///   training iterations exceeds `max_n_iterations` even if the
    ///   `tolerance` convergence condition has not been met;
    /// * as the outcome depends on centroid initialization, we restart the
    ///   algorithm `n_runs` times and keep the best output in terms of
    ///   inertia, the summed cosine dissimilarity of every sample to its
    ///   assigned centroid over all views.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `tolerance = 1e-4`
    /// * `max_n_iterations = 300`
    /// * `n_runs = 10`
    /// * `init = MultiviewKMeansInit::Random`
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(MultiviewKMeansValidParams {
            n_runs: 10,
            tolerance: F::cast(1e-4),
            max_n_iterations: 300,
            n_clusters,
            init: MultiviewKMeansInit::Random,
            rng,
        })
    }

    /// Change the value of `n_runs`
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// Change the value of `tolerance`
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: MultiviewKMeansInit<F>) -> Self {
        self.0.init = init;
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for MultiviewKMeansParams<F, R> {
    type Checked = MultiviewKMeansValidParams<F, R>;
    type Error = MultiviewKMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(MultiviewKMeansParamsError::NClusters)
        } else if self.0.n_runs == 0 {
            Err(MultiviewKMeansParamsError::NRuns)
        } else if self.0.tolerance < F::zero() {
            Err(MultiviewKMeansParamsError::Tolerance)
        } else if self.0.max_n_iterations == 0 {
            Err(MultiviewKMeansParamsError::MaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> MultiviewKMeansValidParams<F, R> {
    /// The final result will be the best output of `n_runs` restarts in
    /// terms of inertia.
    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    /// A restart is considered converged when the summed squared centroid
    /// displacement after a training iteration is lower or equal than
    /// `tolerance`. A tolerance of zero requires an exact fixed point.
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// We exit the training loop of a restart when the number of training
    /// iterations exceeds `max_n_iterations` even if the `tolerance`
    /// convergence condition has not been met.
    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// The number of clusters we will be looking for in the training data.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Centroid initialization strategy
    pub fn init_method(&self) -> &MultiviewKMeansInit<F> {
        &self.init
    }

    /// Returns the random generator
    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        MultiviewKMeans, MultiviewKMeansParams, MultiviewKMeansParamsError,
        MultiviewKMeansValidParams,
    };
    use linfa::ParamGuard;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<MultiviewKMeansParams<f64, Xoshiro256Plus>>();
        has_autotraits::<MultiviewKMeansValidParams<f64, Xoshiro256Plus>>();
    }

    #[test]
    fn n_clusters_cannot_be_zero() {
        let res = MultiviewKMeans::<f32>::params(0).check();
        assert!(matches!(res, Err(MultiviewKMeansParamsError::NClusters)));
    }

    #[test]
    fn tolerance_cannot_be_negative() {
        let res = MultiviewKMeans::<f64>::params(1).tolerance(-1.).check();
        assert!(matches!(res, Err(MultiviewKMeansParamsError::Tolerance)));
    }

    #[test]
    fn tolerance_zero_is_accepted() {
        assert!(MultiviewKMeans::<f64>::params(1).tolerance(0.).check().is_ok());
    }

    #[test]
    fn max_n_iterations_cannot_be_zero() {
        let res = MultiviewKMeans::<f64>::params(1).max_n_iterations(0).check();
        assert!(matches!(
            res,
            Err(MultiviewKMeansParamsError::MaxIterations)
        ));
    }

    #[test]
    fn n_runs_cannot_be_zero() {
        let res = MultiviewKMeans::<f64>::params(1).n_runs(0).check();
        assert!(matches!(res, Err(MultiviewKMeansParamsError::NRuns)));
    }
}

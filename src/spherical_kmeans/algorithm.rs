use linfa::{prelude::*, DatasetBase, Float};
use ndarray::{Array1, Array2, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{
    MultiviewKMeansError, MultiviewKMeansInit, MultiviewKMeansParams, MultiviewKMeansValidParams,
};
use crate::view_set::{normalize_rows, ViewSet};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Multi-view spherical K-means fits one shared cluster assignment across
/// several aligned views of unit-norm vectors.
///
/// Every view is a matrix with one row per sample; row `i` of each view
/// describes the same entity. The algorithm maintains one set of unit-norm
/// *centroids* per view and a single label per sample, and minimizes the
/// *inertia*: the cosine dissimilarity `1 - cos(x, c)` of every sample to
/// its assigned centroid, summed over all views. Clustering the views
/// jointly rather than independently lets weakly informative views borrow
/// structure from strong ones.
///
/// ## Algorithm
///
/// Each restart seeds `n_clusters` centroids from one shared draw of
/// sample indices (see [`MultiviewKMeansInit`]) and then alternates two
/// steps until the centroids stop moving or `max_n_iterations` is reached:
///
/// - assignment: each sample goes to the cluster maximizing the *summed*
///   cosine similarity over all views, ties broken towards the lowest
///   cluster index;
/// - update: each (view, cluster) centroid becomes the renormalized mean
///   of its members. A cluster that loses all members keeps its previous
///   centroid unchanged, so the update can never produce NaN.
///
/// The fit runs `n_runs` restarts from a single cloned RNG stream and
/// keeps the first restart achieving the lowest final inertia, which makes
/// the result reproducible for a fixed seed. Reaching `max_n_iterations`
/// is not an error; the best-effort result is returned and
/// [`converged`](MultiviewKMeans::converged) reports it.
///
/// ## Parallelisation
///
/// The assignment step is embarrassingly parallel over samples and is
/// parallelised thanks to the `rayon` feature in `ndarray`. The update
/// step and the restarts run on a single thread.
///
/// ## Tutorial
///
/// ```
/// use linfa::DatasetBase;
/// use linfa::traits::{Fit, Predict};
/// use linfa_multiview::{sample_vmf, MultiviewKMeans, ViewSet};
/// use ndarray::{array, concatenate, Axis};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
///
/// // Two views of the same 40 samples, each with two directional clusters
/// let views = ViewSet::new(vec![
///     concatenate![
///         Axis(0),
///         sample_vmf(&array![1., 0., 0.], 30.0, 20, &mut rng),
///         sample_vmf(&array![0., 0., 1.], 30.0, 20, &mut rng)
///     ],
///     concatenate![
///         Axis(0),
///         sample_vmf(&array![0., 1., 0.], 30.0, 20, &mut rng),
///         sample_vmf(&array![0., -1., 0.], 30.0, 20, &mut rng)
///     ],
/// ])
/// .unwrap();
///
/// let model = MultiviewKMeans::params_with_rng(2, rng)
///     .n_runs(10)
///     .fit(&DatasetBase::new(views.clone(), ()))
///     .expect("multi-view spherical k-means fitted");
///
/// // One label per sample, shared across the views
/// let labels = model.predict(&DatasetBase::new(views, ()));
/// assert_eq!(labels.len(), 40);
/// assert_eq!(&labels, model.labels());
/// ```
pub struct MultiviewKMeans<F: Float> {
    centroids: Vec<Array2<F>>,
    cluster_count: Array1<F>,
    labels: Array1<usize>,
    inertia: F,
    converged: bool,
}

impl<F: Float> MultiviewKMeans<F> {
    pub fn params(n_clusters: usize) -> MultiviewKMeansParams<F, Xoshiro256Plus> {
        MultiviewKMeansParams::new(n_clusters, Xoshiro256Plus::seed_from_u64(42))
    }

    pub fn params_with_rng<R: Rng + Clone>(
        n_clusters: usize,
        rng: R,
    ) -> MultiviewKMeansParams<F, R> {
        MultiviewKMeansParams::new(n_clusters, rng)
    }

    /// Return the fitted centroids, one `(n_clusters, n_features_v)`
    /// matrix per view. Every row of every matrix has unit L2 norm.
    pub fn centroids(&self) -> &[Array2<F>] {
        &self.centroids
    }

    /// Return the number of training samples belonging to each cluster
    pub fn cluster_count(&self) -> &Array1<F> {
        &self.cluster_count
    }

    /// Return the cluster labels of the training samples, consistent with
    /// the fitted centroids.
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Return the summed cosine dissimilarity between every training
    /// sample and its assigned centroid, over all views.
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Whether the winning restart met the tolerance criterion before
    /// exhausting `max_n_iterations`.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Assign new samples to the fitted centroids without refitting.
    ///
    /// The views must match the fitted model in number and per-view
    /// feature dimension; the sample count is free. Rows are normalized
    /// defensively before the similarity computation.
    pub fn try_predict(
        &self,
        views: &ViewSet<F>,
    ) -> Result<Array1<usize>, MultiviewKMeansError> {
        self.validate_views(views)?;
        let views = views.normalized_views();
        let mut memberships = Array1::zeros(views[0].nrows());
        update_cluster_memberships(&self.centroids, &views, &mut memberships);
        Ok(memberships)
    }

    fn validate_views(&self, views: &ViewSet<F>) -> Result<(), MultiviewKMeansError> {
        if views.n_views() != self.centroids.len() {
            return Err(MultiviewKMeansError::ViewCountMismatch {
                expected: self.centroids.len(),
                actual: views.n_views(),
            });
        }
        for (v, (view, centroids)) in views.views().iter().zip(&self.centroids).enumerate() {
            if view.ncols() != centroids.ncols() {
                return Err(MultiviewKMeansError::DimensionMismatch {
                    view: v,
                    expected: centroids.ncols(),
                    actual: view.ncols(),
                });
            }
        }
        Ok(())
    }
}

impl<F: Float, R: Rng + Clone> MultiviewKMeansParams<F, R> {
    /// Check the hyperparameters, fit the views and return the training
    /// labels of the best restart.
    pub fn fit_predict<T>(
        &self,
        dataset: &DatasetBase<ViewSet<F>, T>,
    ) -> Result<Array1<usize>, MultiviewKMeansError> {
        let model = self.check_ref()?.fit(dataset)?;
        Ok(model.labels)
    }
}

impl<F: Float, R: Rng + Clone, T> Fit<ViewSet<F>, T, MultiviewKMeansError>
    for MultiviewKMeansValidParams<F, R>
{
    type Object = MultiviewKMeans<F>;

    /// Given a `ViewSet` with `n_samples` aligned rows per view, `fit`
    /// identifies `n_clusters` centroids per view and one shared cluster
    /// label per sample.
    ///
    /// An instance of `MultiviewKMeans` is returned.
    fn fit(
        &self,
        dataset: &DatasetBase<ViewSet<F>, T>,
    ) -> Result<Self::Object, MultiviewKMeansError> {
        let mut rng = self.rng().clone();
        let n_samples = dataset.records().nsamples();
        let n_clusters = self.n_clusters();

        if n_clusters > n_samples {
            return Err(MultiviewKMeansError::TooManyClusters {
                n_clusters,
                n_samples,
            });
        }
        if let MultiviewKMeansInit::Precomputed(centroids) = self.init_method() {
            validate_precomputed(centroids, dataset.records(), n_clusters)?;
        }

        let views = dataset.records().normalized_views();

        let mut min_inertia = F::infinity();
        let mut best = None;
        let mut memberships = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);

        for _ in 0..self.n_runs() {
            let mut centroids = self.init_method().run(n_clusters, &views, &mut rng);
            for centroid in centroids.iter_mut() {
                normalize_rows(centroid);
            }
            let mut converged = false;
            for _ in 0..self.max_n_iterations() {
                update_memberships_and_dists(&centroids, &views, &mut memberships, &mut dists);
                let new_centroids = compute_centroids(&centroids, &views, &memberships);
                let shift = centroid_shift(&centroids, &new_centroids);
                centroids = new_centroids;
                if shift <= self.tolerance() {
                    converged = true;
                    break;
                }
            }
            // One more assignment pass so labels and inertia refer to the
            // final centroids of this restart.
            update_memberships_and_dists(&centroids, &views, &mut memberships, &mut dists);
            let inertia = dists.sum();

            if inertia < min_inertia {
                min_inertia = inertia;
                best = Some((centroids, memberships.clone(), converged));
            }
        }

        let (centroids, labels, converged) = best.ok_or(MultiviewKMeansError::InertiaError)?;
        let mut cluster_count = Array1::zeros(n_clusters);
        labels.iter().for_each(|&c| cluster_count[c] += F::one());

        Ok(MultiviewKMeans {
            centroids,
            cluster_count,
            labels,
            inertia: min_inertia,
            converged,
        })
    }
}

impl<F: Float> PredictInplace<ViewSet<F>, Array1<usize>> for MultiviewKMeans<F> {
    /// Given a `ViewSet` matching the fitted model in view count and
    /// per-view feature dimension, `predict` returns, for each sample, the
    /// index of the cluster with the highest summed cosine similarity.
    ///
    /// For a fallible variant use
    /// [`try_predict`](MultiviewKMeans::try_predict).
    fn predict_inplace(&self, views: &ViewSet<F>, memberships: &mut Array1<usize>) {
        assert_eq!(
            views.nsamples(),
            memberships.len(),
            "The number of data points must match the number of memberships."
        );
        if let Err(err) = self.validate_views(views) {
            panic!("{}", err);
        }

        let views = views.normalized_views();
        update_cluster_memberships(&self.centroids, &views, memberships);
    }

    fn default_target(&self, x: &ViewSet<F>) -> Array1<usize> {
        Array1::zeros(x.nsamples())
    }
}

fn validate_precomputed<F: Float>(
    centroids: &[Array2<F>],
    views: &ViewSet<F>,
    n_clusters: usize,
) -> Result<(), MultiviewKMeansError> {
    if centroids.len() != views.n_views() {
        return Err(MultiviewKMeansError::ViewCountMismatch {
            expected: views.n_views(),
            actual: centroids.len(),
        });
    }
    for (v, (centroid, view)) in centroids.iter().zip(views.views()).enumerate() {
        if centroid.nrows() != n_clusters {
            return Err(MultiviewKMeansError::PrecomputedClusterMismatch {
                expected: n_clusters,
                actual: centroid.nrows(),
            });
        }
        if centroid.ncols() != view.ncols() {
            return Err(MultiviewKMeansError::DimensionMismatch {
                view: v,
                expected: view.ncols(),
                actual: centroid.ncols(),
            });
        }
    }
    Ok(())
}

/// `compute_centroids` returns one `(n_clusters, n_features_v)` matrix per
/// view, where row `k` is the renormalized mean of the rows assigned to
/// cluster `k`. Empty clusters keep their previous centroid; a cluster
/// whose members cancel out exactly (zero-norm sum) does too.
fn compute_centroids<F: Float>(
    old_centroids: &[Array2<F>],
    // one (n_samples, n_features_v) matrix per view
    views: &[Array2<F>],
    // (n_samples,)
    cluster_memberships: &Array1<usize>,
) -> Vec<Array2<F>> {
    let n_clusters = old_centroids[0].nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    cluster_memberships.iter().for_each(|&c| counts[c] += 1);

    old_centroids
        .iter()
        .zip(views)
        .map(|(old, view)| {
            let mut centroids = Array2::zeros((n_clusters, view.ncols()));
            Zip::from(view.rows())
                .and(cluster_memberships)
                .for_each(|row, &membership| {
                    let mut centroid = centroids.row_mut(membership);
                    centroid += &row;
                });

            // Dividing the summed rows by their norm yields the normalized
            // mean directly; the 1/count factor cancels.
            for (k, mut centroid) in centroids.rows_mut().into_iter().enumerate() {
                let norm = centroid.dot(&centroid).sqrt();
                if counts[k] == 0 || norm <= F::zero() {
                    centroid.assign(&old.row(k));
                } else {
                    centroid /= norm;
                }
            }
            centroids
        })
        .collect()
}

/// Summed squared displacement between two centroid sets, over all views.
fn centroid_shift<F: Float>(old_centroids: &[Array2<F>], new_centroids: &[Array2<F>]) -> F {
    old_centroids
        .iter()
        .zip(new_centroids)
        .map(|(old, new)| (old - new).mapv(|x| x * x).sum())
        .fold(F::zero(), |acc, x| acc + x)
}

// Update `cluster_memberships` with the index of the cluster each sample
// belongs to.
pub(crate) fn update_cluster_memberships<F: Float>(
    centroids: &[Array2<F>],
    views: &[Array2<F>],
    cluster_memberships: &mut Array1<usize>,
) {
    Zip::indexed(cluster_memberships).par_for_each(|sample, cluster_membership| {
        *cluster_membership = closest_centroid(centroids, views, sample).0
    });
}

// Updates `dists` with the joint cosine dissimilarity of each sample from
// its closest centroid.
pub(crate) fn update_min_dists<F: Float>(
    centroids: &[Array2<F>],
    views: &[Array2<F>],
    dists: &mut Array1<F>,
) {
    Zip::indexed(dists)
        .par_for_each(|sample, dist| *dist = closest_centroid(centroids, views, sample).1);
}

// Efficient combination of `update_cluster_memberships` and
// `update_min_dists`.
pub(crate) fn update_memberships_and_dists<F: Float>(
    centroids: &[Array2<F>],
    views: &[Array2<F>],
    cluster_memberships: &mut Array1<usize>,
    dists: &mut Array1<F>,
) {
    Zip::indexed(cluster_memberships)
        .and(dists)
        .par_for_each(|sample, cluster_membership, dist| {
            let (membership, dist_) = closest_centroid(centroids, views, sample);
            *cluster_membership = membership;
            *dist = dist_;
        });
}

/// Given one centroid set per view, return the index of the cluster with
/// the highest summed cosine similarity to `sample`, together with the
/// sample's joint cosine dissimilarity `sum_v (1 - cos)` to that cluster.
/// Ties go to the lowest cluster index.
pub(crate) fn closest_centroid<F: Float>(
    centroids: &[Array2<F>],
    views: &[Array2<F>],
    sample: usize,
) -> (usize, F) {
    let n_clusters = centroids[0].nrows();
    let mut closest_index = 0;
    let mut maximum_similarity = F::neg_infinity();

    for cluster_index in 0..n_clusters {
        let mut similarity = F::zero();
        for (view, view_centroids) in views.iter().zip(centroids) {
            similarity = similarity + view.row(sample).dot(&view_centroids.row(cluster_index));
        }
        if similarity > maximum_similarity {
            closest_index = cluster_index;
            maximum_similarity = similarity;
        }
    }
    // Unit rows keep every per-view similarity in [-1, 1]; the clamp only
    // strips negative rounding noise.
    let dissimilarity = (F::cast(views.len()) - maximum_similarity).max(F::zero());
    (closest_index, dissimilarity)
}

use linfa::Float;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand;
use ndarray_rand::rand::distributions::{Distribution, WeightedIndex};
use ndarray_rand::rand::Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::algorithm::update_min_dists;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Specifies centroid initialization for [multi-view spherical
/// K-means](crate::MultiviewKMeans).
///
/// The `Random` and `KMeansPlusPlus` strategies select *sample indices*
/// and seed every view with the rows at those indices. Drawing one shared
/// index set, rather than one draw per view, guarantees that cluster `k`
/// starts from the same underlying samples in every view; independent
/// per-view draws would break the shared-assignment semantics of the
/// algorithm.
pub enum MultiviewKMeansInit<F: Float> {
    /// `n_clusters` distinct sample indices drawn uniformly at random
    Random,
    /// K-means++ seeding: indices drawn one at a time, weighted by the
    /// joint cosine dissimilarity to the already chosen seeds
    KMeansPlusPlus,
    /// Uses the provided centroids, one `(n_clusters, n_features_v)`
    /// matrix per view
    Precomputed(Vec<Array2<F>>),
}

impl<F: Float> MultiviewKMeansInit<F> {
    pub(crate) fn run(
        &self,
        n_clusters: usize,
        views: &[Array2<F>],
        rng: &mut impl Rng,
    ) -> Vec<Array2<F>> {
        match self {
            Self::Random => shared_random_init(n_clusters, views, rng),
            Self::KMeansPlusPlus => k_means_pp(n_clusters, views, rng),
            Self::Precomputed(centroids) => centroids.clone(),
        }
    }
}

fn select_indices<F: Float>(views: &[Array2<F>], indices: &[usize]) -> Vec<Array2<F>> {
    views
        .iter()
        .map(|view| view.select(Axis(0), indices))
        .collect()
}

fn shared_random_init<F: Float>(
    n_clusters: usize,
    views: &[Array2<F>],
    rng: &mut impl Rng,
) -> Vec<Array2<F>> {
    let n_samples = views[0].nrows();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    select_indices(views, &indices)
}

fn k_means_pp<F: Float>(
    n_clusters: usize,
    views: &[Array2<F>],
    rng: &mut impl Rng,
) -> Vec<Array2<F>> {
    let n_samples = views[0].nrows();
    let mut indices = Vec::with_capacity(n_clusters);
    indices.push(rng.gen_range(0..n_samples));

    let mut dists = Array1::zeros(n_samples);
    while indices.len() < n_clusters {
        let seeds = select_indices(views, &indices);
        update_min_dists(&seeds, views, &mut dists);
        // Chosen samples have zero dissimilarity to themselves and are
        // never drawn again. If every sample coincides with a seed, all
        // weights are zero and we fall back to a uniform draw.
        let next = match WeightedIndex::new(dists.iter()) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        indices.push(next);
    }
    select_indices(views, &indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_set::normalize_rows;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn normalized(mut views: Vec<Array2<f64>>) -> Vec<Array2<f64>> {
        for view in views.iter_mut() {
            normalize_rows(view);
        }
        views
    }

    #[test]
    fn random_init_uses_the_same_indices_in_every_view() {
        // Make every row of view 1 the negation of the row in view 0, so a
        // shared index draw is detectable.
        let view0 = normalized(vec![array![
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [-1.0, 1.0]
        ]])
        .remove(0);
        let view1 = view0.mapv(|x| -x);
        let views = vec![view0.clone(), view1.clone()];

        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let centroids = MultiviewKMeansInit::Random.run(2, &views, &mut rng);
        assert_eq!(centroids.len(), 2);
        assert_eq!(centroids[0].dim(), (2, 2));
        for k in 0..2 {
            let c0 = centroids[0].row(k);
            let c1 = centroids[1].row(k);
            assert!(c0.iter().zip(c1.iter()).all(|(a, b)| *a == -*b));
        }
    }

    #[test]
    fn kmeans_pp_survives_fully_duplicated_samples() {
        // Every row is the same point, so after the first seed all
        // dissimilarities are zero and seeding must not panic.
        let views = normalized(vec![
            array![[1.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 0.0]],
            array![[0.0, 1.0], [0.0, 1.0], [0.0, 1.0], [0.0, 1.0]],
        ]);
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        let centroids = MultiviewKMeansInit::KMeansPlusPlus.run(3, &views, &mut rng);
        assert_eq!(centroids.len(), 2);
        for (view, centroid) in views.iter().zip(&centroids) {
            assert_eq!(centroid.dim(), (3, 2));
            for row in centroid.rows() {
                assert_eq!(row, view.row(0));
            }
        }
    }

    #[test]
    fn kmeans_pp_selects_distinct_samples() {
        let views = normalized(vec![
            array![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]],
            array![[1.0, 1.0], [1.0, -1.0], [-1.0, 1.0], [-1.0, -1.0]],
        ]);
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let centroids = MultiviewKMeansInit::KMeansPlusPlus.run(4, &views, &mut rng);
        // With four samples and four clusters every sample must be chosen
        // exactly once, so each view's centroid matrix is a permutation of
        // its rows.
        for (view, centroid) in views.iter().zip(&centroids) {
            let mut matched = vec![false; 4];
            for row in view.rows() {
                let hit = centroid
                    .rows()
                    .into_iter()
                    .position(|c| c.iter().zip(row.iter()).all(|(a, b)| a == b))
                    .expect("every sample appears among the centroids");
                matched[hit] = true;
            }
            assert!(matched.iter().all(|&m| m));
        }
    }
}

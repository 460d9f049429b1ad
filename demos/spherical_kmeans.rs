use linfa::DatasetBase;
use linfa_multiview::{
    generate_directional_blobs, MultiviewKMeans, NormalizedMutualInfo, ViewSet,
};
use ndarray::{Array1, Array2};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

const RANDOM_SEED: u64 = 10;
const NUM_PER_CLASS: usize = 500;

/// Two views of two directional classes, sampled from von Mises-Fisher
/// distributions, together with the ground-truth class labels.
fn create_data(
    seed: u64,
    view_means: [Array2<f64>; 2],
    view_kappas: [[f64; 2]; 2],
) -> (ViewSet<f64>, Array1<usize>) {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let views = IntoIterator::into_iter(view_means)
        .zip(IntoIterator::into_iter(view_kappas))
        .map(|(means, kappas)| generate_directional_blobs(NUM_PER_CLASS, &means, &kappas, &mut rng))
        .collect();
    let labels = Array1::from_shape_fn(2 * NUM_PER_CLASS, |i| i / NUM_PER_CLASS);
    (ViewSet::new(views).expect("views are aligned"), labels)
}

/// Run spherical k-means on each view separately, on the concatenated
/// views, and jointly on both views, reporting the normalized mutual
/// information of every clustering against the true classes.
fn perform_clustering(
    seed: u64,
    views: &ViewSet<f64>,
    labels: &Array1<usize>,
    n_clusters: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let rng = Xoshiro256Plus::seed_from_u64(seed);

    // Single-view baselines: each view on its own, then all views stacked
    // into one matrix.
    for v in 0..views.n_views() {
        let single = ViewSet::new(vec![views.view(v).clone()])?;
        let clusters = MultiviewKMeans::params_with_rng(n_clusters, rng.clone())
            .n_runs(100)
            .fit_predict(&DatasetBase::new(single, ()))?;
        let nmi: f64 = labels.normalized_mutual_info(&clusters)?;
        println!("Single-view View {} NMI Score: {:.3}", v, nmi);
    }

    let stacked = ViewSet::new(vec![views.concatenated()])?;
    let clusters = MultiviewKMeans::params_with_rng(n_clusters, rng.clone())
        .n_runs(100)
        .fit_predict(&DatasetBase::new(stacked, ()))?;
    let nmi: f64 = labels.normalized_mutual_info(&clusters)?;
    println!("Single-view Concatenated NMI Score: {:.3}", nmi);

    // Joint multi-view clustering over both views at once.
    let clusters = MultiviewKMeans::params_with_rng(n_clusters, rng)
        .n_runs(100)
        .fit_predict(&DatasetBase::new(views.clone(), ()))?;
    let nmi: f64 = labels.normalized_mutual_info(&clusters)?;
    println!("Multi-view NMI Score: {:.3}", nmi);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Well separated cluster components in both views");
    println!("-----------------------------------------------");
    let (views, labels) = create_data(
        RANDOM_SEED,
        [
            ndarray::array![[-1., 1., 1.], [1., 1., 1.]],
            ndarray::array![[1., -1., 1.], [1., -1., -1.]],
        ],
        [[15., 15.], [15., 15.]],
    );
    perform_clustering(RANDOM_SEED, &views, &labels, 2)?;

    println!();
    println!("Highly overlapping cluster components in both views");
    println!("----------------------------------------------------");
    let (views, labels) = create_data(
        RANDOM_SEED,
        [
            ndarray::array![[0.5, 1., 1.], [1., 1., 1.]],
            ndarray::array![[1., -1., 1.], [1., -1., 0.5]],
        ],
        [[15., 15.], [15., 15.]],
    );
    perform_clustering(RANDOM_SEED, &views, &labels, 2)?;

    Ok(())
}

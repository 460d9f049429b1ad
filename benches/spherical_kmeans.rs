use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_multiview::{generate_directional_blobs, MultiviewKMeans, ViewSet};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn multiview_spherical_kmeans_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let cluster_sizes = vec![(100, 4), (400, 10), (3000, 10)];

    let mut benchmark = c.benchmark_group("multiview_spherical_kmeans");
    for (cluster_size, n_clusters) in cluster_sizes {
        let rng = &mut rng;
        let n_features = 3;
        let views = (0..2)
            .map(|_| {
                let directions =
                    Array2::random_using((n_clusters, n_features), Uniform::new(-1., 1.), rng);
                generate_directional_blobs(cluster_size, &directions, &vec![20.0; n_clusters], rng)
            })
            .collect();
        let dataset = DatasetBase::new(ViewSet::new(views).unwrap(), ());
        benchmark.bench_function(
            BenchmarkId::new("multiview_spherical_kmeans", cluster_size),
            |bencher| {
                bencher.iter(|| {
                    MultiviewKMeans::params_with_rng(black_box(n_clusters), black_box(rng.clone()))
                        .max_n_iterations(black_box(1000))
                        .tolerance(black_box(1e-3))
                        .fit(&dataset)
                        .unwrap()
                });
            },
        );
    }

    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = multiview_spherical_kmeans_bench
}
criterion_main!(benches);

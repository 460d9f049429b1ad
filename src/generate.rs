use ndarray::{s, Array, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::{Beta, Distribution, StandardNormal};
use ndarray_rand::RandomExt;

/// Draw `n_samples` points from a von Mises-Fisher distribution with the
/// given mean direction and concentration `kappa`.
///
/// The von Mises-Fisher distribution is the directional analogue of an
/// isotropic Gaussian: its samples live on the unit hypersphere and
/// concentrate around `mean_direction` as `kappa` grows, while `kappa = 0`
/// yields the uniform distribution on the sphere. Sampling uses Wood's
/// rejection algorithm for the angular component and a tangent-normal
/// decomposition for the direction orthogonal to the mean.
///
/// `mean_direction` is normalized internally and must have non-zero norm
/// and at least 2 dimensions; `kappa` must not be negative.
///
/// `sample_vmf` can be used to quickly assemble a synthetic directional
/// dataset to test or benchmark spherical clustering algorithms.
pub fn sample_vmf(
    mean_direction: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    kappa: f64,
    n_samples: usize,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let dim = mean_direction.len();
    assert!(
        dim >= 2,
        "von Mises-Fisher sampling requires at least 2 dimensions"
    );
    assert!(kappa >= 0.0, "concentration parameter cannot be negative");
    let norm = mean_direction.dot(mean_direction).sqrt();
    assert!(norm > 0.0, "mean direction must have non-zero norm");
    let mean_direction = mean_direction.mapv(|x| x / norm);

    let mut samples = Array2::zeros((n_samples, dim));
    for mut row in samples.rows_mut() {
        let w = sample_angular_component(kappa, dim, rng);
        let tangent = sample_orthonormal_to(&mean_direction, rng);
        let sample = tangent * (1.0 - w * w).max(0.0).sqrt() + &mean_direction * w;
        row.assign(&sample);
    }
    samples
}

/// Generate `blob_size` samples around each row of `mean_directions`, each
/// blob drawn from a von Mises-Fisher distribution with the matching entry
/// of `kappas`, stacked in order into a `(n_blobs * blob_size, dim)`
/// matrix.
pub fn generate_directional_blobs(
    blob_size: usize,
    mean_directions: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    kappas: &[f64],
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_blobs, dim) = mean_directions.dim();
    assert_eq!(
        n_blobs,
        kappas.len(),
        "one concentration parameter per mean direction"
    );

    let mut blobs = Array2::zeros((n_blobs * blob_size, dim));
    for (blob_index, (direction, &kappa)) in
        mean_directions.rows().into_iter().zip(kappas).enumerate()
    {
        let blob = sample_vmf(&direction, kappa, blob_size, rng);
        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

// Wood's rejection sampling for the cosine of the angle between a sample
// and the mean direction.
fn sample_angular_component(kappa: f64, dim: usize, rng: &mut impl Rng) -> f64 {
    let d = (dim - 1) as f64;
    let b = d / ((4.0 * kappa * kappa + d * d).sqrt() + 2.0 * kappa);
    let x0 = (1.0 - b) / (1.0 + b);
    let c = kappa * x0 + d * (1.0 - x0 * x0).ln();
    let beta = Beta::new(d / 2.0, d / 2.0).expect("beta parameters are positive");
    loop {
        let z = beta.sample(rng);
        let w = (1.0 - (1.0 + b) * z) / (1.0 - (1.0 - b) * z);
        let u: f64 = rng.gen();
        if kappa * w + d * (1.0 - x0 * w).ln() - c >= u.ln() {
            return w;
        }
    }
}

// A unit vector drawn uniformly from the subspace orthogonal to `direction`.
fn sample_orthonormal_to(direction: &Array1<f64>, rng: &mut impl Rng) -> Array1<f64> {
    loop {
        let candidate: Array1<f64> = Array::random_using(direction.len(), StandardNormal, rng);
        let orthogonal = &candidate - &(direction * candidate.dot(direction));
        let norm = orthogonal.dot(&orthogonal).sqrt();
        if norm > 1e-10 {
            return orthogonal / norm;
        }
    }
}

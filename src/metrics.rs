//! Common metrics for comparing cluster assignments
use std::collections::HashMap;

use linfa::error::{Error, Result};
use linfa::Float;
use ndarray::{ArrayBase, Data, Ix1};

/// Evaluates the agreement between two cluster assignments of the same
/// samples.
pub trait NormalizedMutualInfo<F> {
    /// Computes the normalized mutual information between two label
    /// vectors of equal length.
    ///
    /// The mutual information of the two assignments is normalized by the
    /// arithmetic mean of their entropies, giving a score in `[0, 1]`:
    /// 1 when the assignments are identical up to a relabeling of the
    /// clusters, 0 when they are independent. The measure is symmetric
    /// and invariant under permutations of the label values, which makes
    /// it suitable for scoring a clustering against ground-truth classes.
    fn normalized_mutual_info<D2: Data<Elem = usize>>(
        &self,
        other: &ArrayBase<D2, Ix1>,
    ) -> Result<F>;
}

impl<F: Float, D: Data<Elem = usize>> NormalizedMutualInfo<F> for ArrayBase<D, Ix1> {
    fn normalized_mutual_info<D2: Data<Elem = usize>>(
        &self,
        other: &ArrayBase<D2, Ix1>,
    ) -> Result<F> {
        if self.len() != other.len() {
            return Err(Error::Parameters(format!(
                "label vectors have lengths {} and {}",
                self.len(),
                other.len()
            )));
        }
        if self.is_empty() {
            return Err(Error::NotEnoughSamples);
        }

        let n = self.len() as f64;
        let mut joint: HashMap<(usize, usize), f64> = HashMap::new();
        let mut left: HashMap<usize, f64> = HashMap::new();
        let mut right: HashMap<usize, f64> = HashMap::new();
        for (&a, &b) in self.iter().zip(other.iter()) {
            *joint.entry((a, b)).or_insert(0.0) += 1.0;
            *left.entry(a).or_insert(0.0) += 1.0;
            *right.entry(b).or_insert(0.0) += 1.0;
        }

        // Two trivial single-cluster assignments carry no information but
        // agree perfectly.
        if left.len() == 1 && right.len() == 1 {
            return Ok(F::one());
        }

        let entropy = |counts: &HashMap<usize, f64>| {
            counts
                .values()
                .map(|&count| {
                    let p = count / n;
                    -p * p.ln()
                })
                .sum::<f64>()
        };

        let mut mutual_info = 0.0;
        for (&(a, b), &count) in joint.iter() {
            let p_joint = count / n;
            let p_left = left[&a] / n;
            let p_right = right[&b] / n;
            mutual_info += p_joint * (p_joint / (p_left * p_right)).ln();
        }

        let normalizer = 0.5 * (entropy(&left) + entropy(&right));
        if normalizer <= f64::EPSILON {
            return Ok(F::zero());
        }
        Ok(F::cast((mutual_info / normalizer).clamp(0.0, 1.0)))
    }
}

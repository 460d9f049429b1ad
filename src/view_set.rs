use linfa::dataset::Records;
use linfa::Float;
use ndarray::{s, Array2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{MultiviewError, Result};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// An ordered collection of feature matrices ("views") describing the same
/// samples.
///
/// Each view has shape `(n_samples, n_features_v)`: row `i` of every view
/// refers to the same underlying sample, while the number of features may
/// differ from view to view. A `ViewSet` is validated on construction and
/// never mutated afterwards; algorithms that require unit-norm rows
/// normalize a defensive copy.
///
/// `ViewSet` implements [`Records`], so it can be wrapped in a
/// [`DatasetBase`](linfa::DatasetBase) and passed to the
/// [`Fit`](linfa::traits::Fit) and [`Predict`](linfa::traits::Predict)
/// traits like any other record type. `nfeatures` reports the total
/// feature count over all views.
pub struct ViewSet<F> {
    views: Vec<Array2<F>>,
}

impl<F: Float> ViewSet<F> {
    /// Validate and wrap a collection of views.
    ///
    /// Fails if the collection is empty, if the sample counts disagree
    /// across views, or if any view contains NaN or infinite values.
    pub fn new(views: Vec<Array2<F>>) -> Result<Self> {
        if views.is_empty() {
            return Err(MultiviewError::EmptyViewSet);
        }
        let n_samples = views[0].nrows();
        for (v, view) in views.iter().enumerate() {
            if view.nrows() != n_samples {
                return Err(MultiviewError::SampleCountMismatch {
                    view: v,
                    expected: n_samples,
                    actual: view.nrows(),
                });
            }
            if view.iter().any(|x| !x.is_finite()) {
                return Err(MultiviewError::NonFiniteData(v));
            }
        }
        Ok(ViewSet { views })
    }

    /// Number of views in the collection.
    pub fn n_views(&self) -> usize {
        self.views.len()
    }

    /// The views as a slice of `(n_samples, n_features_v)` matrices.
    pub fn views(&self) -> &[Array2<F>] {
        &self.views
    }

    /// A single view by index.
    pub fn view(&self, v: usize) -> &Array2<F> {
        &self.views[v]
    }

    /// Per-view feature counts.
    pub fn feature_dims(&self) -> Vec<usize> {
        self.views.iter().map(|v| v.ncols()).collect()
    }

    /// Horizontal concatenation of all views into a single
    /// `(n_samples, total_features)` matrix.
    ///
    /// Useful for comparing a multi-view method against a single-view
    /// baseline run on the stacked representation.
    pub fn concatenated(&self) -> Array2<F> {
        let n_samples = self.nsamples();
        let mut stacked = Array2::zeros((n_samples, self.nfeatures()));
        let mut offset = 0;
        for view in &self.views {
            stacked
                .slice_mut(s![.., offset..offset + view.ncols()])
                .assign(view);
            offset += view.ncols();
        }
        stacked
    }

    /// Copies of all views with every row scaled to unit L2 norm.
    /// Zero-norm rows are left as zero vectors.
    pub(crate) fn normalized_views(&self) -> Vec<Array2<F>> {
        self.views
            .iter()
            .map(|view| {
                let mut view = view.clone();
                normalize_rows(&mut view);
                view
            })
            .collect()
    }
}

impl<F: Float> Records for ViewSet<F> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.views[0].nrows()
    }

    fn nfeatures(&self) -> usize {
        self.views.iter().map(|v| v.ncols()).sum()
    }
}

/// Scale each row of `matrix` to unit L2 norm, leaving zero rows untouched.
pub(crate) fn normalize_rows<F: Float>(matrix: &mut Array2<F>) {
    for mut row in matrix.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > F::zero() {
            row /= norm;
        }
    }
}

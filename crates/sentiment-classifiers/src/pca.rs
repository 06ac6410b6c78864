//! Principal component analysis over TF-IDF rows
//!
//! The sparse rows are densified and handed to `linfa-reduction`, which centres
//! them and extracts the leading components with a truncated SVD. Projection
//! subtracts the training mean before applying the components.

use crate::tfidf::SparseVector;
use linfa::prelude::*;
use linfa::DatasetBase;
use linfa_reduction::Pca as LinfaPca;
use ndarray::{Array1, Array2, Axis};
use sentiment_core::{Error, Result};
use tracing::{debug, info};

/// Fitted linear projection onto the leading principal components
#[derive(Debug, Clone)]
pub struct Pca {
    model: LinfaPca<f64>,
    n_components: usize,
    n_features: usize,
    /// Share of the training variance kept by the components
    explained_variance_ratio: f64,
}

impl Pca {
    pub fn fit(rows: &[SparseVector], n_components: usize) -> Result<Self> {
        let n = rows.len();
        let d = rows.first().map(|r| r.dim).unwrap_or(0);
        if rows.iter().any(|r| r.dim != d) {
            return Err(Error::fit("PCA rows have inconsistent dimensionality"));
        }
        let rank_bound = n.min(d);
        if n < 2 || n_components == 0 || n_components > rank_bound {
            return Err(Error::fit(format!(
                "n_components={n_components} must be between 1 and min(n_samples={n}, n_features={d}), with at least 2 samples"
            )));
        }

        let records = densify(rows, d);
        let total_variance = records.var_axis(Axis(0), 1.0).sum();

        let model = LinfaPca::params(n_components)
            .fit(&DatasetBase::from(records.clone()))
            .map_err(|e| Error::fit(format!("PCA failed: {e}")))?;

        let projected: Array2<f64> = model.predict(&records);
        let kept_variance = projected.var_axis(Axis(0), 1.0).sum();
        let explained_variance_ratio = if total_variance > 0.0 {
            kept_variance / total_variance
        } else {
            0.0
        };

        info!(
            "Fitted PCA: {} -> {} components on {} rows (explained variance ratio {:.4})",
            d, n_components, n, explained_variance_ratio
        );

        Ok(Self {
            model,
            n_components,
            n_features: d,
            explained_variance_ratio,
        })
    }

    /// Project one vectorized row into component space
    pub fn transform(&self, row: &SparseVector) -> Array1<f64> {
        self.transform_all(std::slice::from_ref(row))
            .row(0)
            .to_owned()
    }

    /// Project a batch of rows, one output row per input row
    pub fn transform_all(&self, rows: &[SparseVector]) -> Array2<f64> {
        let records = densify(rows, self.n_features);
        let projected: Array2<f64> = self.model.predict(&records);
        debug!("Projected {} rows", rows.len());
        projected
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn explained_variance_ratio(&self) -> f64 {
        self.explained_variance_ratio
    }
}

/// Stack sparse rows into a dense `rows x dim` matrix
fn densify(rows: &[SparseVector], dim: usize) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((rows.len(), dim));
    for (i, row) in rows.iter().enumerate() {
        debug_assert_eq!(row.dim, dim);
        let mut target = out.row_mut(i);
        for (j, v) in row.iter() {
            target[j] = v;
        }
    }
    out
}

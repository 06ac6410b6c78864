//! Linear-kernel support vector machine
//!
//! Fitted with `linfa-svm` (SMO solver, C-SVC). For a linear kernel the dual
//! solution collapses to a single weight vector, so only `w = sum(alpha_i x_i)`
//! and the intercept `rho` are kept. The decision function is `f(x) = w.x - rho`
//! and the predicted class is positive iff `f(x) > 0`.

use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, ArrayView1, ArrayView2};
use sentiment_core::{Error, Result, Sentiment};
use tracing::info;

/// Training parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmParams {
    /// Regularization constant, applied to both classes
    pub c: f64,
    /// Solver stopping tolerance
    pub tolerance: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearSvm {
    weights: Array1<f64>,
    rho: f64,
}

impl LinearSvm {
    pub fn fit(x: ArrayView2<'_, f64>, labels: &[Sentiment], params: SvmParams) -> Result<Self> {
        let n = x.nrows();
        if n != labels.len() {
            return Err(Error::fit(format!(
                "{n} training points but {} labels",
                labels.len()
            )));
        }
        let positives = labels.iter().filter(|l| **l == Sentiment::Positive).count();
        if positives == 0 || positives == n {
            return Err(Error::fit(
                "SVM training data must contain both positive and negative rows",
            ));
        }

        let records = x.to_owned();
        let targets: Array1<bool> = labels.iter().map(|l| *l == Sentiment::Positive).collect();
        let dataset = Dataset::new(records, targets);

        let model = Svm::<_, bool>::params()
            .pos_neg_weights(params.c, params.c)
            .eps(params.tolerance)
            .linear_kernel()
            .fit(&dataset)
            .map_err(|e| Error::fit(format!("SVM training failed: {e}")))?;

        // w = sum(alpha_i * x_i); alpha already carries the label sign
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut support_vectors = 0;
        for (row, &alpha) in dataset.records().outer_iter().zip(model.alpha.iter()) {
            if alpha != 0.0 {
                weights.scaled_add(alpha, &row);
                support_vectors += 1;
            }
        }

        info!(
            "Fitted linear SVM: C={}, {} support vectors out of {} rows",
            params.c, support_vectors, n
        );

        Ok(Self {
            weights,
            rho: model.rho,
        })
    }

    /// Signed distance-like score; positive means the positive class
    pub fn decision_score(&self, x: ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(&x) - self.rho
    }

    pub fn predict(&self, x: ArrayView1<'_, f64>) -> Sentiment {
        if self.decision_score(x) > 0.0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Intercept, subtracted from `w.x`
    pub fn rho(&self) -> f64 {
        self.rho
    }
}

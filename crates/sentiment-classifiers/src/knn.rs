//! k-nearest-neighbour majority voter over reduced vectors
//!
//! Neighbours are found with a `linfa-nn` linear scan under Euclidean distance.
//! The index only borrows the training points, so it is rebuilt per query.

use linfa_nn::distance::L2Dist;
use linfa_nn::{LinearSearch, NearestNeighbour};
use ndarray::{Array2, ArrayView1, ArrayView2};
use sentiment_core::{Error, Result, Sentiment};
use tracing::info;

#[derive(Debug, Clone)]
pub struct KnnClassifier {
    points: Array2<f64>,
    labels: Vec<Sentiment>,
    k: usize,
}

/// Vote tally among the nearest neighbours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Votes {
    pub positive: usize,
    pub negative: usize,
}

impl Votes {
    /// Majority label; a tie goes to the lower class (negative)
    pub fn winner(&self) -> Sentiment {
        if self.positive > self.negative {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

impl KnnClassifier {
    pub fn fit(points: ArrayView2<'_, f64>, labels: &[Sentiment], k: usize) -> Result<Self> {
        if points.nrows() != labels.len() {
            return Err(Error::fit(format!(
                "{} training points but {} labels",
                points.nrows(),
                labels.len()
            )));
        }
        if k == 0 || k > labels.len() {
            return Err(Error::fit(format!(
                "n_neighbors={k} must be between 1 and the number of training rows ({})",
                labels.len()
            )));
        }
        // Fail here rather than on the first query
        LinearSearch::new()
            .from_batch(&points, L2Dist)
            .map_err(|e| Error::fit(format!("cannot index training points: {e}")))?;

        info!("Fitted KNN classifier: k={}, {} training points", k, labels.len());
        Ok(Self {
            points: points.to_owned(),
            labels: labels.to_vec(),
            k,
        })
    }

    /// Count labels among the `k` closest training points
    pub fn votes(&self, query: ArrayView1<'_, f64>) -> Result<Votes> {
        let index = LinearSearch::new()
            .from_batch(&self.points, L2Dist)
            .map_err(|e| Error::internal(format!("nearest-neighbour index: {e}")))?;
        let neighbours = index
            .k_nearest(query, self.k)
            .map_err(|e| Error::internal(format!("nearest-neighbour query: {e}")))?;

        let mut votes = Votes::default();
        for (_, i) in neighbours {
            match self.labels[i] {
                Sentiment::Positive => votes.positive += 1,
                Sentiment::Negative => votes.negative += 1,
            }
        }
        Ok(votes)
    }

    pub fn predict(&self, query: ArrayView1<'_, f64>) -> Result<Sentiment> {
        Ok(self.votes(query)?.winner())
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }
}

//! Labelled review corpus loading and train/test splitting

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sentiment_core::{Error, Result, Sentiment};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const REVIEW_COLUMN: &str = "review";
const SENTIMENT_COLUMN: &str = "sentiment";

/// Handling of rows whose sentiment is neither "positive" nor "negative"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Fail loading on the first bad row
    #[default]
    Reject,
    /// Drop bad rows and keep going
    Skip,
}

#[derive(Debug, Deserialize)]
struct ReviewRecord {
    review: String,
    sentiment: String,
}

/// Ordered labelled reviews
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub texts: Vec<String>,
    pub labels: Vec<Sentiment>,
}

impl Corpus {
    /// Build a corpus from in-memory `(text, label)` pairs using dataset spellings
    pub fn from_pairs<'a, I>(rows: I, policy: LabelPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut corpus = Self::default();
        let mut skipped = 0usize;
        for (row, (text, label)) in rows.into_iter().enumerate() {
            if !corpus.push_labelled(row + 1, text.to_string(), label, policy)? {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!("Skipped {} rows with invalid sentiment labels", skipped);
        }
        Ok(corpus)
    }

    /// Read at most `row_limit` records from a CSV file with `review` and `sentiment` columns
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        row_limit: usize,
        policy: LabelPolicy,
    ) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dataset from {}", path.display());
        let file = std::fs::File::open(path).map_err(|e| {
            Error::dataset(format!("cannot open dataset {}: {e}", path.display()))
        })?;
        Self::from_csv_reader(file, row_limit, policy)
    }

    /// Read at most `row_limit` records from any CSV source
    pub fn from_csv_reader<R: Read>(
        reader: R,
        row_limit: usize,
        policy: LabelPolicy,
    ) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in [REVIEW_COLUMN, SENTIMENT_COLUMN] {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::dataset(format!(
                    "missing required column '{column}'"
                )));
            }
        }

        let mut corpus = Self::default();
        let mut skipped = 0usize;
        for (row, record) in reader
            .deserialize::<ReviewRecord>()
            .take(row_limit)
            .enumerate()
        {
            let record = record?;
            if !corpus.push_labelled(row + 1, record.review, &record.sentiment, policy)? {
                skipped += 1;
            }
        }

        if skipped > 0 {
            warn!("Skipped {} rows with invalid sentiment labels", skipped);
        }
        if corpus.is_empty() {
            return Err(Error::dataset("dataset contains no usable rows"));
        }

        info!(
            "Loaded {} rows ({} positive, {} negative)",
            corpus.len(),
            corpus.count(Sentiment::Positive),
            corpus.count(Sentiment::Negative)
        );
        Ok(corpus)
    }

    /// Returns false when the row was skipped
    fn push_labelled(
        &mut self,
        row: usize,
        text: String,
        label: &str,
        policy: LabelPolicy,
    ) -> Result<bool> {
        match Sentiment::from_label(label) {
            Some(sentiment) => {
                self.texts.push(text);
                self.labels.push(sentiment);
                Ok(true)
            }
            None => match policy {
                LabelPolicy::Reject => Err(Error::InvalidLabel {
                    row,
                    label: label.to_string(),
                }),
                LabelPolicy::Skip => {
                    debug!("Skipping row {} with label {:?}", row, label);
                    Ok(false)
                }
            },
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.labels.iter().filter(|l| **l == sentiment).count()
    }
}

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and hold out `ceil(n * test_ratio)` rows.
///
/// Test indices are taken from the front of the permutation, train from the rest.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<Split> {
    let n_test = (n as f64 * test_ratio).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(Error::fit(format!(
            "cannot split {n} rows with test_ratio {test_ratio}: \
             train ({n_train}) and test ({n_test}) must both be non-empty"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "review,sentiment\n\
        \"Great film, loved it\",positive\n\
        Terrible plot,negative\n\
        Wonderful acting,positive\n";

    #[test]
    fn test_reads_prefix_only() {
        let corpus = Corpus::from_csv_reader(CSV.as_bytes(), 2, LabelPolicy::Reject).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.texts[0], "Great film, loved it");
        assert_eq!(corpus.labels, vec![Sentiment::Positive, Sentiment::Negative]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "id,sentiment,review\n1,negative,bad\n2,positive,good\n";
        let corpus = Corpus::from_csv_reader(csv.as_bytes(), 10, LabelPolicy::Reject).unwrap();
        assert_eq!(corpus.texts, vec!["bad", "good"]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "text,sentiment\nhello,positive\n";
        let err = Corpus::from_csv_reader(csv.as_bytes(), 10, LabelPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_empty_dataset_is_error() {
        let csv = "review,sentiment\n";
        let err = Corpus::from_csv_reader(csv.as_bytes(), 10, LabelPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_invalid_label_rejected_or_skipped() {
        let csv = "review,sentiment\nok,positive\nmeh,neutral\nbad,negative\n";

        let err = Corpus::from_csv_reader(csv.as_bytes(), 10, LabelPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { row: 2, ref label } if label == "neutral"));

        let corpus = Corpus::from_csv_reader(csv.as_bytes(), 10, LabelPolicy::Skip).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.count(Sentiment::Negative), 1);
    }

    #[test]
    fn test_missing_file_is_dataset_error() {
        let err = Corpus::from_csv_path("/nonexistent/reviews.csv", 10, LabelPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let split = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rounds_test_side_up() {
        let split = train_test_split(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_split_is_seeded() {
        assert_eq!(
            train_test_split(50, 0.2, 42).unwrap(),
            train_test_split(50, 0.2, 42).unwrap()
        );
        assert_ne!(
            train_test_split(50, 0.2, 42).unwrap(),
            train_test_split(50, 0.2, 7).unwrap()
        );
    }

    #[test]
    fn test_split_too_small() {
        assert!(train_test_split(1, 0.2, 42).is_err());
        assert!(train_test_split(0, 0.2, 42).is_err());
    }
}

//! TF-IDF vectorizer over word unigrams and bigrams
//!
//! Behaviour follows the usual defaults for text classification:
//! - lowercase, tokens are runs of two or more word characters
//! - English stop words are dropped before n-grams are formed
//! - the vocabulary keeps the `max_features` most frequent terms
//! - smooth IDF: `ln((1 + n) / (1 + df)) + 1`
//! - raw counts times IDF, each row L2-normalized

use crate::stop_words;
use regex::Regex;
use sentiment_core::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, info};

const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse row produced by the vectorizer. Indices are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    pub dim: usize,
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dense copy, mostly for tests and debugging
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

/// Fitted vocabulary and IDF weights
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    token_pattern: Regex,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and IDF weights from `documents`
    pub fn fit<S: AsRef<str>>(
        documents: &[S],
        max_features: usize,
        ngram_range: (usize, usize),
    ) -> Result<Self> {
        let token_pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::internal(format!("invalid token pattern: {e}")))?;

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut term_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let counts = count_terms(&token_pattern, doc.as_ref(), ngram_range);
            for (term, count) in counts {
                *term_frequency.entry(term.clone()).or_default() += count;
                *document_frequency.entry(term).or_default() += 1;
            }
        }

        if term_frequency.is_empty() {
            return Err(Error::fit(
                "empty vocabulary; documents contain only stop words or no tokens",
            ));
        }

        let mut terms: Vec<(String, usize)> = term_frequency.into_iter().collect();
        let total_terms = terms.len();
        if terms.len() > max_features {
            terms.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            terms.truncate(max_features);
        }
        terms.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, (term, _)) in terms.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        info!(
            "Fitted TF-IDF vocabulary: {} of {} terms kept from {} documents",
            vocabulary.len(),
            total_terms,
            documents.len()
        );

        Ok(Self {
            vocabulary,
            idf,
            ngram_range,
            token_pattern,
        })
    }

    /// Vectorize one document. The result always has `vocabulary_size()` columns.
    pub fn transform(&self, document: &str) -> SparseVector {
        let counts = count_terms(&self.token_pattern, document, self.ngram_range);

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(&term)
                    .map(|&index| (index, count as f64 * self.idf[index]))
            })
            .collect();
        entries.sort_unstable_by_key(|(index, _)| *index);

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= norm;
            }
        }

        let (indices, values) = entries.into_iter().unzip();
        SparseVector {
            dim: self.idf.len(),
            indices,
            values,
        }
    }

    /// Vectorize a batch of documents
    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        let rows: Vec<SparseVector> = documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect();
        debug!("Vectorized {} documents", rows.len());
        rows
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }
}

fn count_terms(
    pattern: &Regex,
    document: &str,
    (min_n, max_n): (usize, usize),
) -> HashMap<String, usize> {
    let lowered = document.to_lowercase();
    let tokens: Vec<&str> = pattern
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !stop_words::is_stop_word(t))
        .collect();

    let mut counts = HashMap::new();
    for n in min_n..=max_n {
        if n == 0 || n > tokens.len() {
            continue;
        }
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_default() += 1;
        }
    }
    counts
}

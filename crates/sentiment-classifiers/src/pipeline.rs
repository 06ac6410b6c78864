//! Fitting and inference for the TF-IDF → PCA → classifier pipeline
//!
//! [`PipelineBuilder`] runs once at startup and produces a [`SentimentPipeline`]:
//! 1. vectorizer fitted on every loaded row
//! 2. seeded train/test split
//! 3. reducer fitted on the training rows only, then applied to both splits
//! 4. classifier fitted on the reduced training rows
//! 5. held-out accuracy computed on the reduced test rows
//!
//! The fitted pipeline is immutable; inference only reads it.

use crate::classifier::{Classifier, FittedClassifier};
use crate::config::{ClassifierSettings, ModelConfig, Variant};
use crate::dataset::{train_test_split, Corpus};
use crate::knn::KnnClassifier;
use crate::pca::Pca;
use crate::svm::{LinearSvm, SvmParams};
use crate::tfidf::TfidfVectorizer;
use ndarray::{Array2, ArrayView1};
use sentiment_core::{ClassificationResult, Error, Result, Sentiment};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Held-out scoring computed right after fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Reduced test split kept from fitting
#[derive(Debug, Clone)]
pub struct HeldOut {
    pub points: Array2<f64>,
    pub labels: Vec<Sentiment>,
}

/// Builds a fitted pipeline from a model configuration
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    config: ModelConfig,
}

impl PipelineBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            name: format!("tfidf-pca-{}", config.variant()),
            config,
        }
    }

    /// Override the pipeline name reported by [`Classifier::name`]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Load the configured row prefix from a CSV file and fit on it
    pub fn fit_from_path(&self, path: impl AsRef<Path>) -> Result<SentimentPipeline> {
        self.config.validate()?;
        let corpus = Corpus::from_csv_path(path, self.config.row_limit, self.config.label_policy)?;
        self.fit(&corpus)
    }

    /// Fit every stage on an already-loaded corpus
    pub fn fit(&self, corpus: &Corpus) -> Result<SentimentPipeline> {
        let config = &self.config;
        config.validate()?;
        if corpus.is_empty() {
            return Err(Error::dataset("cannot fit on an empty corpus"));
        }
        let start = Instant::now();

        let texts = if corpus.len() > config.row_limit {
            &corpus.texts[..config.row_limit]
        } else {
            &corpus.texts[..]
        };
        let labels = &corpus.labels[..texts.len()];

        let vectorizer = TfidfVectorizer::fit(texts, config.max_features, config.ngram_range)?;
        let vectors = vectorizer.transform_all(texts);

        let split = train_test_split(texts.len(), config.test_ratio, config.seed)?;
        let train_vectors: Vec<_> = split.train.iter().map(|&i| vectors[i].clone()).collect();
        let test_vectors: Vec<_> = split.test.iter().map(|&i| vectors[i].clone()).collect();
        let train_labels: Vec<Sentiment> = split.train.iter().map(|&i| labels[i]).collect();
        let test_labels: Vec<Sentiment> = split.test.iter().map(|&i| labels[i]).collect();

        let reducer = Pca::fit(&train_vectors, config.n_components)?;
        let train_points = reducer.transform_all(&train_vectors);
        let test_points = reducer.transform_all(&test_vectors);

        let classifier = match &config.classifier {
            ClassifierSettings::Knn { neighbors } => FittedClassifier::Knn(KnnClassifier::fit(
                train_points.view(),
                &train_labels,
                *neighbors,
            )?),
            ClassifierSettings::Svm { c, tolerance } => FittedClassifier::Svm(LinearSvm::fit(
                train_points.view(),
                &train_labels,
                SvmParams {
                    c: *c,
                    tolerance: *tolerance,
                },
            )?),
        };

        let held_out = HeldOut {
            points: test_points,
            labels: test_labels,
        };
        let mut correct = 0;
        for (point, label) in held_out.points.outer_iter().zip(&held_out.labels) {
            if classifier.predict(point)? == *label {
                correct += 1;
            }
        }
        let evaluation = Evaluation {
            accuracy: correct as f64 / held_out.labels.len() as f64,
            train_rows: train_labels.len(),
            test_rows: held_out.labels.len(),
        };

        info!(
            "Pipeline '{}' fitted in {:?}: held-out accuracy {:.3} ({} train / {} test rows)",
            self.name,
            start.elapsed(),
            evaluation.accuracy,
            evaluation.train_rows,
            evaluation.test_rows
        );

        Ok(SentimentPipeline {
            name: self.name.clone(),
            vectorizer,
            reducer,
            classifier,
            held_out,
            evaluation,
        })
    }
}

/// Fitted vectorizer, reducer and classifier
#[derive(Debug, Clone)]
pub struct SentimentPipeline {
    name: String,
    vectorizer: TfidfVectorizer,
    reducer: Pca,
    classifier: FittedClassifier,
    held_out: HeldOut,
    evaluation: Evaluation,
}

impl SentimentPipeline {
    /// Classify one phrase
    pub fn predict(&self, phrase: &str) -> Result<ClassificationResult> {
        if phrase.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        let start = Instant::now();

        let vector = self.vectorizer.transform(phrase);
        let reduced = self.reducer.transform(&vector);
        let mut result = self.classifier.classify(reduced.view())?;
        result.latency_us = start.elapsed().as_micros() as u64;

        debug!(
            "Classified phrase ({} known terms) as {} in {}us",
            vector.nnz(),
            result.sentiment,
            result.latency_us
        );
        Ok(result)
    }

    /// Predict a point that is already in component space
    pub fn predict_reduced(&self, point: ArrayView1<'_, f64>) -> Result<Sentiment> {
        self.classifier.predict(point)
    }

    /// Predictions for the held-out split, in split order
    pub fn held_out_predictions(&self) -> Result<Vec<Sentiment>> {
        self.held_out
            .points
            .outer_iter()
            .map(|point| self.classifier.predict(point))
            .collect()
    }

    pub fn held_out(&self) -> &HeldOut {
        &self.held_out
    }

    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn reducer(&self) -> &Pca {
        &self.reducer
    }
}

#[async_trait::async_trait]
impl Classifier for SentimentPipeline {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        self.predict(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn variant(&self) -> Variant {
        self.classifier.variant()
    }
}

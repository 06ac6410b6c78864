//! Configuration for the fitted sentiment pipeline

use crate::dataset::LabelPolicy;
use sentiment_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which classifier family a deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// k-nearest-neighbour voter, label only
    #[default]
    Knn,
    /// Linear margin classifier, label plus confidence
    Svm,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "knn" => Ok(Self::Knn),
            "svm" => Ok(Self::Svm),
            other => Err(format!("unknown variant '{other}', expected 'knn' or 'svm'")),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Knn => f.write_str("knn"),
            Self::Svm => f.write_str("svm"),
        }
    }
}

/// Classifier hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClassifierSettings {
    /// k-nearest-neighbour majority vote over Euclidean distance
    Knn {
        #[serde(default = "default_neighbors")]
        neighbors: usize,
    },

    /// Linear-kernel C-SVC
    Svm {
        /// Regularization constant
        #[serde(default = "default_c")]
        c: f64,

        /// Solver stopping tolerance
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
}

impl ClassifierSettings {
    pub fn variant(&self) -> Variant {
        match self {
            Self::Knn { .. } => Variant::Knn,
            Self::Svm { .. } => Variant::Svm,
        }
    }
}

/// Everything the pipeline builder needs to fit the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Only the first `row_limit` dataset rows are used
    pub row_limit: usize,

    /// Vocabulary cap for the vectorizer
    pub max_features: usize,

    /// Inclusive n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Output dimensionality of the reducer
    #[serde(default = "default_components")]
    pub n_components: usize,

    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,

    /// Seed for the train/test shuffle
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// What to do with rows whose label is not positive/negative
    #[serde(default)]
    pub label_policy: LabelPolicy,

    /// Classifier hyperparameters
    pub classifier: ClassifierSettings,
}

impl ModelConfig {
    /// Nearest-neighbour deployment: 500 rows, 10 000 features, k = 5
    pub fn knn() -> Self {
        Self {
            row_limit: 500,
            max_features: 10_000,
            ngram_range: default_ngram_range(),
            n_components: default_components(),
            test_ratio: default_test_ratio(),
            seed: default_seed(),
            label_policy: LabelPolicy::default(),
            classifier: ClassifierSettings::Knn {
                neighbors: default_neighbors(),
            },
        }
    }

    /// Linear SVM deployment: 10 000 rows, 5 000 features, C = 1
    pub fn svm() -> Self {
        Self {
            row_limit: 10_000,
            max_features: 5_000,
            classifier: ClassifierSettings::Svm {
                c: default_c(),
                tolerance: default_tolerance(),
            },
            ..Self::knn()
        }
    }

    /// Preset for a variant
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Knn => Self::knn(),
            Variant::Svm => Self::svm(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.classifier.variant()
    }

    /// Reject values that can never produce a usable model
    pub fn validate(&self) -> Result<()> {
        if self.row_limit == 0 {
            return Err(Error::config("row_limit must be greater than 0"));
        }
        if self.max_features == 0 {
            return Err(Error::config("max_features must be greater than 0"));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::config(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        if self.n_components == 0 {
            return Err(Error::config("n_components must be greater than 0"));
        }
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(Error::config(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        match &self.classifier {
            ClassifierSettings::Knn { neighbors } if *neighbors == 0 => {
                Err(Error::config("neighbors must be greater than 0"))
            }
            ClassifierSettings::Svm { c, .. } if !(*c > 0.0) => {
                Err(Error::config(format!("svm c must be positive, got {c}")))
            }
            ClassifierSettings::Svm { tolerance, .. } if !(*tolerance > 0.0) => Err(Error::config(
                format!("svm tolerance must be positive, got {tolerance}"),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::knn()
    }
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

fn default_components() -> usize {
    50
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_neighbors() -> usize {
    5
}

fn default_c() -> f64 {
    1.0
}

fn default_tolerance() -> f64 {
    1e-3
}

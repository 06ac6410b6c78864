//! Sentiment Classifiers
//!
//! Offline-fitted text sentiment pipeline:
//! - TF-IDF vectorization over unigrams and bigrams with English stop words removed
//! - PCA reduction fitted on the training split only
//! - a k-nearest-neighbour voter or a linear SVM on the reduced vectors
//!
//! Everything is fitted once by [`PipelineBuilder`] and then shared read-only
//! through the [`Classifier`] trait.

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod knn;
pub mod pca;
pub mod pipeline;
pub mod stop_words;
pub mod svm;
pub mod tfidf;

pub use classifier::{Classifier, FittedClassifier};
pub use config::{ClassifierSettings, ModelConfig, Variant};
pub use dataset::{train_test_split, Corpus, LabelPolicy, Split};
pub use knn::KnnClassifier;
pub use pca::Pca;
pub use pipeline::{Evaluation, HeldOut, PipelineBuilder, SentimentPipeline};
pub use svm::{LinearSvm, SvmParams};
pub use tfidf::{SparseVector, TfidfVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::config::{ModelConfig, Variant};
    pub use crate::dataset::{Corpus, LabelPolicy};
    pub use crate::pipeline::{PipelineBuilder, SentimentPipeline};
}

//! Classifier trait and the fitted decision model

use crate::config::Variant;
use crate::knn::KnnClassifier;
use crate::svm::LinearSvm;
use async_trait::async_trait;
use ndarray::ArrayView1;
use sentiment_core::{ClassificationResult, Confidence, Result, Sentiment};

/// Trait for anything that can label a phrase
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Which model family answers, which decides the response shape
    fn variant(&self) -> Variant;
}

/// Decision model fitted on reduced vectors. Exactly one family per deployment.
#[derive(Debug, Clone)]
pub enum FittedClassifier {
    Knn(KnnClassifier),
    Svm(LinearSvm),
}

impl FittedClassifier {
    pub fn variant(&self) -> Variant {
        match self {
            Self::Knn(_) => Variant::Knn,
            Self::Svm(_) => Variant::Svm,
        }
    }

    pub fn predict(&self, x: ArrayView1<'_, f64>) -> Result<Sentiment> {
        match self {
            Self::Knn(knn) => knn.predict(x),
            Self::Svm(svm) => Ok(svm.predict(x)),
        }
    }

    /// Signed decision score, only defined for the margin classifier
    pub fn decision_score(&self, x: ArrayView1<'_, f64>) -> Option<f64> {
        match self {
            Self::Knn(_) => None,
            Self::Svm(svm) => Some(svm.decision_score(x)),
        }
    }

    /// Label plus, for the margin classifier, confidence percentages
    pub fn classify(&self, x: ArrayView1<'_, f64>) -> Result<ClassificationResult> {
        let sentiment = self.predict(x)?;
        Ok(match self.decision_score(x) {
            Some(score) => ClassificationResult::new(sentiment)
                .with_confidence(Confidence::from_decision_score(score)),
            None => ClassificationResult::new(sentiment),
        })
    }
}

//! Core types for the sentiment service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary review sentiment
///
/// Datasets spell labels in lowercase (`"positive"` / `"negative"`), while
/// responses use the capitalized form (`"Positive"` / `"Negative"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Parse a dataset label. Only the exact lowercase spellings are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    /// Response spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence percentages for the two classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// Percentage (0-100) for the positive class
    pub positive: f64,

    /// Percentage (0-100) for the negative class
    pub negative: f64,
}

impl Confidence {
    /// Build from a signed decision score.
    ///
    /// The score is squashed with the logistic function; the negative share is
    /// the complement of the positive one so the pair always sums to 100.
    pub fn from_decision_score(score: f64) -> Self {
        let probability = 1.0 / (1.0 + (-score).exp());
        let positive = (probability * 100.0).clamp(0.0, 100.0);
        Self {
            positive,
            negative: 100.0 - positive,
        }
    }
}

/// Result of classifying one phrase
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Predicted sentiment
    pub sentiment: Sentiment,

    /// Class percentages, only reported by margin-based classifiers
    pub confidence: Option<Confidence>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a result without confidence
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            sentiment,
            confidence: None,
            latency_us: 0,
        }
    }

    /// Attach confidence percentages
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(Sentiment::from_label("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label("negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("Positive"), None);
        assert_eq!(Sentiment::from_label("neutral"), None);
    }

    #[test]
    fn test_response_spelling() {
        assert_eq!(Sentiment::Positive.to_string(), "Positive");
        assert_eq!(Sentiment::Negative.as_str(), "Negative");
    }

    #[test]
    fn test_confidence_complement() {
        let zero = Confidence::from_decision_score(0.0);
        assert!((zero.positive - 50.0).abs() < 1e-12);
        assert!((zero.negative - 50.0).abs() < 1e-12);

        for score in [-40.0, -2.5, 0.3, 1.7, 800.0] {
            let c = Confidence::from_decision_score(score);
            assert!((c.positive + c.negative - 100.0).abs() < 1e-9);
            assert!((0.0..=100.0).contains(&c.positive));
            assert!((0.0..=100.0).contains(&c.negative));
        }
    }

    #[test]
    fn test_confidence_orders_with_score() {
        let low = Confidence::from_decision_score(-1.0);
        let high = Confidence::from_decision_score(1.0);
        assert!(high.positive > 50.0);
        assert!(low.positive < 50.0);
    }
}

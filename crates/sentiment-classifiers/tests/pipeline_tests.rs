//! Pipeline integration tests
//!
//! Fits the full TF-IDF → PCA → classifier pipeline on a generated review CSV
//! written to a temporary file, using the production presets.

use proptest::prelude::*;
use sentiment_classifiers::{
    Classifier, ClassifierSettings, LabelPolicy, ModelConfig, PipelineBuilder, SentimentPipeline,
    Variant,
};
use sentiment_core::{Error, Sentiment};
use std::io::Write;
use std::sync::OnceLock;
use tempfile::NamedTempFile;

const POSITIVE: [&str; 10] = [
    "wonderful", "touching", "brilliant", "moving", "delightful", "superb", "charming",
    "beautiful", "heartfelt", "masterful",
];
const NEGATIVE: [&str; 10] = [
    "terrible", "awful", "boring", "dull", "tedious", "dreadful", "painful", "lifeless",
    "clumsy", "forgettable",
];
const NOUNS: [&str; 10] = [
    "film", "story", "acting", "script", "cast", "ending", "direction", "soundtrack", "plot",
    "performance",
];

const SETTINGS: [&str; 7] = [
    "I watched it on a rainy weekend",
    "seen at the cinema with friends",
    "streamed it late at night",
    "my family watched it together",
    "caught it on a long flight",
    "rented it after work",
    "saw the premiere downtown",
];

/// 121 alternating reviews; the first row is the smoke-test review
fn generated_rows() -> Vec<(String, &'static str)> {
    let mut rows = vec![(
        "This movie was wonderful and touching".to_string(),
        "positive",
    )];
    for i in 0..120 {
        let (words, label) = if i % 2 == 0 {
            (&POSITIVE, "positive")
        } else {
            (&NEGATIVE, "negative")
        };
        let j = i / 2;
        let text = format!(
            "{}. The {} was {} and {}, a {} {}",
            SETTINGS[j % 7],
            NOUNS[j % 10],
            words[j % 10],
            words[(j / 10 + j * 3 + 1) % 10],
            words[(j * 7 + (j / 10) * 3 + 2) % 10],
            NOUNS[(j / 10 + j * 3 + 4) % 10],
        );
        rows.push((text, label));
    }
    rows
}

fn write_csv(rows: &[(String, &str)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    {
        let mut writer = csv::Writer::from_writer(&mut file);
        writer.write_record(["review", "sentiment"]).unwrap();
        for (text, label) in rows {
            writer.write_record([text.as_str(), *label]).unwrap();
        }
        writer.flush().unwrap();
    }
    file.flush().unwrap();
    file
}

fn reviews_csv() -> &'static NamedTempFile {
    static FILE: OnceLock<NamedTempFile> = OnceLock::new();
    FILE.get_or_init(|| write_csv(&generated_rows()))
}

fn knn_pipeline() -> &'static SentimentPipeline {
    static PIPELINE: OnceLock<SentimentPipeline> = OnceLock::new();
    PIPELINE.get_or_init(|| {
        PipelineBuilder::new(ModelConfig::knn())
            .fit_from_path(reviews_csv().path())
            .unwrap()
    })
}

fn svm_pipeline() -> &'static SentimentPipeline {
    static PIPELINE: OnceLock<SentimentPipeline> = OnceLock::new();
    PIPELINE.get_or_init(|| {
        PipelineBuilder::new(ModelConfig::svm())
            .fit_from_path(reviews_csv().path())
            .unwrap()
    })
}

#[test]
fn test_knn_preset_fits_fifty_components() {
    let pipeline = knn_pipeline();
    assert_eq!(pipeline.variant(), Variant::Knn);
    assert_eq!(pipeline.reducer().n_components(), 50);
    assert_eq!(
        pipeline.reducer().n_features(),
        pipeline.vectorizer().vocabulary_size()
    );

    let evaluation = pipeline.evaluation();
    assert_eq!(evaluation.test_rows, 25);
    assert_eq!(evaluation.train_rows, 96);
    assert!((0.0..=1.0).contains(&evaluation.accuracy));
}

#[test]
fn test_smoke_phrase_is_positive() {
    for pipeline in [knn_pipeline(), svm_pipeline()] {
        let result = pipeline.predict("wonderful and touching film").unwrap();
        assert_eq!(result.sentiment, Sentiment::Positive);
    }
}

#[test]
fn test_clearly_negative_phrase() {
    for pipeline in [knn_pipeline(), svm_pipeline()] {
        let result = pipeline.predict("a boring and tedious plot").unwrap();
        assert_eq!(result.sentiment, Sentiment::Negative);
    }
}

#[test]
fn test_knn_has_no_confidence_svm_does() {
    let knn = knn_pipeline().predict("charming cast").unwrap();
    assert!(knn.confidence.is_none());

    let svm = svm_pipeline().predict("charming cast").unwrap();
    let confidence = svm.confidence.unwrap();
    assert!((confidence.positive + confidence.negative - 100.0).abs() < 1e-9);
}

#[test]
fn test_same_phrase_same_answer() {
    for pipeline in [knn_pipeline(), svm_pipeline()] {
        let first = pipeline.predict("dull acting but a superb soundtrack").unwrap();
        let second = pipeline.predict("dull acting but a superb soundtrack").unwrap();
        assert_eq!(first.sentiment, second.sentiment);
        assert_eq!(first.confidence, second.confidence);
    }
}

#[test]
fn test_refit_reproduces_held_out_predictions() {
    for config in [ModelConfig::knn(), ModelConfig::svm()] {
        let builder = PipelineBuilder::new(config);
        let first = builder.fit_from_path(reviews_csv().path()).unwrap();
        let second = builder.fit_from_path(reviews_csv().path()).unwrap();

        assert_eq!(first.held_out().labels, second.held_out().labels);
        assert_eq!(
            first.held_out_predictions().unwrap(),
            second.held_out_predictions().unwrap()
        );
        assert_eq!(first.evaluation(), second.evaluation());
    }
}

#[test]
fn test_row_limit_truncates_dataset() {
    let mut config = ModelConfig::knn();
    config.row_limit = 70;
    let pipeline = PipelineBuilder::new(config)
        .fit_from_path(reviews_csv().path())
        .unwrap();
    let evaluation = pipeline.evaluation();
    assert_eq!(evaluation.train_rows + evaluation.test_rows, 70);
    assert_eq!(evaluation.test_rows, 14);
}

#[test]
fn test_invalid_label_policy() {
    let mut rows = generated_rows();
    rows[3].1 = "mixed";

    let file = write_csv(&rows);
    let err = PipelineBuilder::new(ModelConfig::knn())
        .fit_from_path(file.path())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLabel { row: 4, .. }));

    let mut config = ModelConfig::knn();
    config.label_policy = LabelPolicy::Skip;
    let pipeline = PipelineBuilder::new(config)
        .fit_from_path(file.path())
        .unwrap();
    let evaluation = pipeline.evaluation();
    assert_eq!(evaluation.train_rows + evaluation.test_rows, 120);
}

#[test]
fn test_missing_column_fails_startup() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "text,label").unwrap();
    writeln!(file, "great,positive").unwrap();
    file.flush().unwrap();

    let err = PipelineBuilder::new(ModelConfig::knn())
        .fit_from_path(file.path())
        .unwrap_err();
    assert!(matches!(err, Error::Dataset(_)));
}

#[test]
fn test_tiny_dataset_fails_instead_of_degrading() {
    let rows: Vec<(String, &str)> = generated_rows().into_iter().take(20).collect();
    let file = write_csv(&rows);
    let err = PipelineBuilder::new(ModelConfig::knn())
        .fit_from_path(file.path())
        .unwrap_err();
    assert!(matches!(err, Error::Fit(_)));

    let mut config = ModelConfig::knn();
    config.n_components = 5;
    config.classifier = ClassifierSettings::Knn { neighbors: 5 };
    assert!(PipelineBuilder::new(config).fit_from_path(file.path()).is_ok());
}

#[tokio::test]
async fn test_classifier_trait_matches_predict() {
    let pipeline: &dyn Classifier = svm_pipeline();
    let via_trait = pipeline.classify("heartfelt performance").await.unwrap();
    let direct = svm_pipeline().predict("heartfelt performance").unwrap();
    assert_eq!(via_trait.sentiment, direct.sentiment);
    assert_eq!(via_trait.confidence, direct.confidence);

    let err = pipeline.classify("  ").await.unwrap_err();
    assert!(err.is_client_error());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_svm_confidence_sums_to_hundred(phrase in "[a-z ]{1,60}") {
        prop_assume!(!phrase.trim().is_empty());
        let result = svm_pipeline().predict(&phrase).unwrap();
        let confidence = result.confidence.unwrap();
        prop_assert!((0.0..=100.0).contains(&confidence.positive));
        prop_assert!((0.0..=100.0).contains(&confidence.negative));
        prop_assert!((confidence.positive + confidence.negative - 100.0).abs() < 1e-9);
        prop_assert_eq!(
            result.sentiment == Sentiment::Positive,
            confidence.positive > 50.0
        );
    }

    #[test]
    fn prop_sentiment_is_binary(words in proptest::collection::vec(0usize..30, 1..8)) {
        let vocabulary: Vec<&str> = POSITIVE.iter().chain(&NEGATIVE).chain(&NOUNS).copied().collect();
        let phrase = words.iter().map(|&i| vocabulary[i]).collect::<Vec<_>>().join(" ");
        let result = knn_pipeline().predict(&phrase).unwrap();
        prop_assert!(matches!(result.sentiment.as_str(), "Positive" | "Negative"));
    }
}

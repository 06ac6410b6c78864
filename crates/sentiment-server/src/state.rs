//! Shared application state

use crate::config::ServerConfig;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiment_classifiers::{Classifier, Evaluation, PipelineBuilder, SentimentPipeline, Variant};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Summary of the fitted model, reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub variant: Variant,
    pub vocabulary_size: usize,
    pub n_components: usize,
    /// Share of training variance kept by the reducer
    pub explained_variance_ratio: Option<f64>,
    pub evaluation: Option<Evaluation>,
}

impl ModelInfo {
    pub fn from_pipeline(pipeline: &SentimentPipeline) -> Self {
        Self {
            name: pipeline.name().to_string(),
            variant: pipeline.variant(),
            vocabulary_size: pipeline.vectorizer().vocabulary_size(),
            n_components: pipeline.reducer().n_components(),
            explained_variance_ratio: Some(pipeline.reducer().explained_variance_ratio()),
            evaluation: Some(pipeline.evaluation()),
        }
    }
}

/// Application state shared across all requests.
///
/// Built once before the listener binds; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// Fitted classifier
    pub classifier: Arc<dyn Classifier>,

    /// Model summary
    pub info: Arc<ModelInfo>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wrap an already-fitted pipeline
    pub fn from_pipeline(pipeline: SentimentPipeline, metrics_handle: Option<PrometheusHandle>) -> Self {
        let info = ModelInfo::from_pipeline(&pipeline);
        Self {
            classifier: Arc::new(pipeline),
            info: Arc::new(info),
            metrics_handle,
        }
    }

    /// Serve any classifier, e.g. a test double
    pub fn with_classifier(classifier: Arc<dyn Classifier>, info: ModelInfo) -> Self {
        Self {
            classifier,
            info: Arc::new(info),
            metrics_handle: None,
        }
    }

    /// Load the dataset and fit the pipeline described by `config`.
    ///
    /// Fitting is CPU-bound and runs on the blocking pool.
    pub async fn initialize(config: &ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        info!(
            "Fitting {} pipeline from {} (row limit {})",
            config.model.variant(),
            config.dataset_path.display(),
            config.model.row_limit
        );

        let builder = PipelineBuilder::new(config.model.clone());
        let dataset_path = config.dataset_path.clone();
        let pipeline = tokio::task::spawn_blocking(move || builder.fit_from_path(dataset_path))
            .await
            .map_err(|e| anyhow::anyhow!("Pipeline fitting task failed: {}", e))??;

        let state = Self::from_pipeline(pipeline, metrics_handle);
        info!(
            "Model ready: {} terms, {} components",
            state.info.vocabulary_size, state.info.n_components
        );
        Ok(state)
    }
}

//! Sentiment Server
//!
//! Fits a TF-IDF → PCA → classifier pipeline from a review CSV at startup,
//! then serves `POST /classify` until shut down.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiment_classifiers::Variant;
use sentiment_server::config::load_env_file;
use sentiment_server::{create_router, AppState, Overrides, ServerConfig};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sentiment-server")]
#[command(about = "Review sentiment classification service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Review dataset CSV (columns: review, sentiment)
    #[arg(short, long, env = "IMDB_FILE_PATH")]
    dataset: Option<PathBuf>,

    /// Classifier variant preset: knn or svm
    #[arg(long)]
    variant: Option<Variant>,

    /// Number of dataset rows to fit on
    #[arg(long)]
    row_limit: Option<usize>,

    /// Listen address
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            dataset: self.dataset.clone(),
            variant: self.variant,
            row_limit: self.row_limit,
            listen: self.listen.clone(),
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` values feed the `env = ...` arguments below
    let env_loaded = load_env_file(".env")?;
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting sentiment server");
    if env_loaded {
        info!("Environment overrides read from .env");
    }

    let config = ServerConfig::load(&cli.config, &cli.overrides())?;
    info!("Configuration loaded successfully");
    info!("Dataset: {}", config.dataset_path.display());
    info!("Variant: {}", config.model.variant());

    let metrics_handle = init_metrics()?;

    // Any dataset or fitting failure stops the process here, before binding.
    let state = AppState::initialize(&config, Some(metrics_handle)).await?;

    let app = create_router(state, config.cors_allow_any_origin);

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiment=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiment=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentiment_requests_total",
        "Total number of classify requests received"
    );
    metrics::describe_counter!(
        "sentiment_predictions_total",
        "Total number of predictions by sentiment"
    );
    metrics::describe_histogram!(
        "sentiment_inference_latency_us",
        metrics::Unit::Microseconds,
        "Single-phrase inference latency in microseconds"
    );
    metrics::describe_counter!("sentiment_errors_total", "Total number of errors by kind");

    info!("Metrics exporter initialized");
    Ok(handle)
}

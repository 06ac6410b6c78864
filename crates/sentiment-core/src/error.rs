//! Error types for the sentiment service

/// Result type alias using the service's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dataset loading, fitting and inference
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dataset is unusable (missing columns, no rows)
    #[error("dataset error: {0}")]
    Dataset(String),

    /// A row carries a sentiment outside {"positive", "negative"}
    #[error("invalid sentiment label {label:?} at row {row}")]
    InvalidLabel { row: usize, label: String },

    /// Model fitting failed (degenerate data, bad dimensions)
    #[error("fit error: {0}")]
    Fit(String),

    /// Inference was asked to classify an empty phrase
    #[error("No phrase provided")]
    EmptyInput,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// CSV parsing errors
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new fit error
    pub fn fit(msg: impl Into<String>) -> Self {
        Self::Fit(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }
}

//! Error types for the noise-markers library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Feature '{0}' not found in comparison group")]
    MissingFeature(String),

    #[error("Invalid value '{value}' for feature '{feature}' in column '{column}'")]
    InvalidValue {
        feature: String,
        column: String,
        value: String,
    },

    #[error("Insufficient data for feature '{feature}' in {group} group: {n} non-missing values, need at least 2")]
    InsufficientData {
        feature: String,
        group: String,
        n: usize,
    },

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MarkerError {
    /// True for failures reading or decoding input (missing file, bad shape, bad config).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            MarkerError::Io(_)
                | MarkerError::Csv(_)
                | MarkerError::Parse(_)
                | MarkerError::EmptyData(_)
                | MarkerError::MissingColumn(_)
                | MarkerError::Yaml(_)
                | MarkerError::Json(_)
        )
    }

    /// True when a statistical precondition was violated.
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            MarkerError::InsufficientData { .. }
                | MarkerError::Numerical(_)
                | MarkerError::InvalidValue { .. }
        )
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, MarkerError>;

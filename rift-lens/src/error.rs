//! Error types for the rift-lens dashboard core.
//!
//! All fallible operations in the crate return [`LensError`] through the
//! [`Result`] alias. Load-time problems (unreadable files, missing columns,
//! malformed values) are reported eagerly so that filtering and aggregation
//! never have to deal with a partially valid dataset.

use thiserror::Error;

/// The main error type for rift-lens.
#[derive(Error, Debug)]
pub enum LensError {
    /// The source could not be read or parsed as a delimited table.
    #[error("Failed to load '{source_name}': {message}")]
    DataLoad {
        /// Description of the source (usually a file path)
        source_name: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required column is absent from the source header.
    #[error("Required column '{column}' not found (available columns: {available:?})")]
    MissingColumn {
        /// The required column name
        column: String,
        /// Columns the source actually exposes
        available: Vec<String>,
    },

    /// A value violates the record schema (non-numeric stat, unknown side, ...).
    #[error("Schema error in column '{column}' at row {row}: {message}")]
    Schema {
        /// Column holding the offending value
        column: String,
        /// One-based data row (header excluded)
        row: usize,
        /// Detailed error message
        message: String,
    },

    /// A selection references a value that is not among the available options.
    #[error("Value '{value}' is not an available option for filter '{dimension}'")]
    InvalidSelection {
        /// Filter dimension name
        dimension: String,
        /// The offending value
        value: String,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, LensError>`.
pub type Result<T> = std::result::Result<T, LensError>;

impl LensError {
    /// Creates a new data load error.
    pub fn data_load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataLoad {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data load error with an underlying cause.
    pub fn data_load_with_source(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataLoad {
            source_name: source_name.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a new schema error for the given column and one-based row.
    pub fn schema(column: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
            row,
            message: message.into(),
        }
    }

    /// Creates a new invalid selection error.
    pub fn invalid_selection(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidSelection {
            dimension: dimension.into(),
            value: value.into(),
        }
    }

    /// Returns true if this error means the dataset could not be loaded.
    ///
    /// Missing columns and schema violations are both load failures; no
    /// partial dataset is ever produced.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::DataLoad { .. }
                | Self::MissingColumn { .. }
                | Self::Schema { .. }
                | Self::DataFusion(_)
                | Self::Arrow(_)
                | Self::Io(_)
        )
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<LensError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            LensError::Internal(inner) => LensError::Internal(format!("{msg}: {inner}")),
            other => LensError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                LensError::Internal(inner) => LensError::Internal(format!("{msg}: {inner}")),
                other => LensError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

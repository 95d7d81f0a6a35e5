//! Error types for the cruisecmp-core library.

use thiserror::Error;

/// Main error type for the cruisecmp library.
#[derive(Error, Debug)]
pub enum CruiseError {
    /// Pattern catalog could not be built.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while building a pattern catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A rule is not a valid regular expression.
    #[error("invalid pattern for {field}: {pattern} ({source})")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A value field rule has nothing to capture.
    #[error("pattern for {field} has no capture group: {pattern}")]
    MissingCaptureGroup { field: String, pattern: String },

    /// The field name is not one the extractor knows.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A discount entry was declared without a label.
    #[error("discount field requires a label")]
    MissingLabel,

    /// A single-valued field was declared twice.
    #[error("field declared more than once: {0}")]
    DuplicateField(String),

    /// A field was declared without any rules.
    #[error("field {0} has no patterns")]
    Empty(String),
}

/// Result type for the cruisecmp library.
pub type Result<T> = std::result::Result<T, CruiseError>;

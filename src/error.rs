//! Error types for the connections source.
//!
//! Every failure aborts the whole invocation: there is no partial page and no
//! degraded result. Variants carry enough context for the caller to decide what
//! to fix.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Not initialized: {operation} requires initialize() to be called first")]
    NotInitialized { operation: String },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String, suggestion: String },

    #[error("Protocol error: expected {expected}, got {actual}")]
    Protocol { expected: String, actual: String },

    #[error("Duplicate column: '{column}' is already registered")]
    DuplicateColumn { column: String },

    #[error("Extraction failed for column '{column}': {message}")]
    Extraction { column: String, message: String },

    #[error("Snapshot error: {message} (path: {path})")]
    Snapshot { message: String, path: String },
}

impl SourceError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not-initialized error for the named operation.
    pub fn not_initialized(operation: impl Into<String>) -> Self {
        Self::NotInitialized {
            operation: operation.into(),
        }
    }

    /// Create an upstream error with a helpful suggestion.
    pub fn upstream_unavailable(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a protocol error describing the expected and received message kinds.
    pub fn protocol(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Protocol {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Create an extraction error tagged with the offending column.
    pub fn extraction(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn snapshot(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UpstreamUnavailable { suggestion, .. } => Some(suggestion),
            Self::NotInitialized { .. } => Some("Call initialize() with an upstream handle"),
            Self::Snapshot { .. } => Some("Check that the snapshot file exists and is valid JSON"),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    ///
    /// The source never retries on its own; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

/// Result type alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

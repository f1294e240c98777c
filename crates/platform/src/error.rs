//! Error types for hostinfo-platform

use thiserror::Error;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Invalid unit: {0}. Must be one of B, KB, MB, GB, TB, PB")]
    InvalidUnit(String),

    #[error("Cannot request both object and string output modes. Please use only one or the other")]
    ConflictingOutputModes,

    #[error("Failed to build platform snapshot: {context}")]
    Snapshot {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PlatformError {
    /// A snapshot failure with no underlying error to attach.
    pub fn snapshot(context: impl Into<String>) -> Self {
        PlatformError::Snapshot {
            context: context.into(),
            source: None,
        }
    }

    /// A snapshot failure wrapping the original cause.
    pub fn snapshot_with(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PlatformError::Snapshot {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

//! Error types for loading and processing the emissions dataset

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a dashboard view
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A source file is missing or unreadable
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed row in the emissions table
    #[error("malformed emissions row in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed geometry document or feature
    #[error("malformed geometry in {}: {message}", path.display())]
    Geometry { path: PathBuf, message: String },

    /// Nothing to compute thresholds from
    #[error("no values to compute thresholds from")]
    EmptyInput,
}

impl DashboardError {
    /// True for either kind of malformed-input error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Csv { .. } | Self::Geometry { .. })
    }
}

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

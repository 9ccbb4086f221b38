//! Error types for panel construction.

use factortest_data::DataError;
use factortest_math::MathError;
use factortest_primitives::Date;
use factortest_traits::SourceError;

/// Errors that can occur while building the research panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// A value that should have been removed upstream reached a fit.
    #[error("data integrity violation on {date}: {reason}")]
    DataIntegrity {
        /// Trading date of the offending cross-section.
        date: Date,
        /// What was found.
        reason: String,
    },

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Membership table without any usable interval.
    #[error("membership table has no intervals: {0}")]
    EmptyMembership(String),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Data source error.
    #[error("data source error: {0}")]
    Source(#[from] SourceError),

    /// Data loading error.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl PanelError {
    /// Returns whether the input itself is broken, so rerunning cannot help
    /// until it is fixed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DataIntegrity { .. })
    }
}

//! Error types for factor evaluation.

/// Errors that can occur while evaluating a factor.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Too few observations for the statistic.
    #[error("insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Available number of observations.
        actual: usize,
    },

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub(crate) fn require_columns(
    df: &polars::prelude::DataFrame,
    names: &[&str],
) -> Result<(), AnalysisError> {
    match names.iter().find(|name| df.column(name).is_err()) {
        Some(name) => Err(AnalysisError::MissingColumn((*name).to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AnalysisError::InsufficientData { required: 2, actual: 1 };
        assert_eq!(err.to_string(), "insufficient data: need at least 2, got 1");
    }
}

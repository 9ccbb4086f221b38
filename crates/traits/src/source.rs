//! Tabular data source abstraction.

use factortest_primitives::DateRange;
use polars::prelude::*;

/// Errors that can occur while fetching a table.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source has no table with this name.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A requested field is absent from the table.
    #[error("missing field {field} in table {table}")]
    MissingField {
        /// Table name.
        table: String,
        /// Field name.
        field: String,
    },

    /// The request cannot be evaluated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Row filter applied by the source before returning a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Field equals the given text value.
    Equals {
        /// Field name.
        field: String,
        /// Expected value.
        value: String,
    },
    /// Date field lies within the inclusive range.
    Between {
        /// Field name.
        field: String,
        /// Date range.
        range: DateRange,
    },
    /// Field matches an SQL `LIKE` pattern (`_` one char, `%` any run).
    Like {
        /// Field name.
        field: String,
        /// Pattern.
        pattern: String,
    },
    /// Any of the inner filters holds.
    AnyOf(Vec<Filter>),
}

impl Filter {
    /// Equality filter.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals { field: field.into(), value: value.into() }
    }

    /// Inclusive date range filter.
    #[must_use]
    pub fn between(field: impl Into<String>, range: DateRange) -> Self {
        Self::Between { field: field.into(), range }
    }

    /// `LIKE` pattern filter.
    #[must_use]
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like { field: field.into(), pattern: pattern.into() }
    }

    /// Fields referenced by this filter.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Equals { field, .. } | Self::Between { field, .. } | Self::Like { field, .. } => {
                vec![field.as_str()]
            }
            Self::AnyOf(inner) => inner.iter().flat_map(Self::fields).collect(),
        }
    }
}

/// Request for a named table: field projection, row filters and sort order.
///
/// All filters must hold for a row to be returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest {
    table: String,
    fields: Vec<String>,
    filters: Vec<Filter>,
    sort_by: Option<String>,
}

impl TableRequest {
    /// Request every field of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into(), fields: Vec::new(), filters: Vec::new(), sort_by: None }
    }

    /// Restrict the returned fields, in this order.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sort ascending by `field` (stable, nulls last).
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    /// Table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Requested fields; empty means all.
    #[must_use]
    pub fn requested_fields(&self) -> &[String] {
        &self.fields
    }

    /// Row filters.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Sort field, if any.
    #[must_use]
    pub fn sort_field(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }
}

/// Capability to fetch raw tables.
///
/// A fetch is a blocking, single-shot request/response. Implementations
/// return the requested fields with filters applied, sorted ascending by the
/// sort field when one is given, with a dense 0-based row order.
pub trait DataSource {
    /// Fetch a table.
    ///
    /// # Errors
    /// Returns `SourceError` if the table or a field is missing, or reading fails.
    fn fetch(&self, request: &TableRequest) -> Result<DataFrame, SourceError>;

    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        "source"
    }
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn fetch(&self, request: &TableRequest) -> Result<DataFrame, SourceError> {
        (**self).fetch(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

use std::collections::HashMap;

use factortest_traits::{DataSource, SourceError, TableRequest};
use polars::prelude::*;

use crate::apply_request;

/// In-memory tables keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, DataFrame>,
}

impl MemorySource {
    /// Empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a table.
    pub fn insert(&mut self, table: impl Into<String>, df: DataFrame) {
        self.tables.insert(table.into(), df);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>, df: DataFrame) -> Self {
        self.insert(table, df);
        self
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, request: &TableRequest) -> Result<DataFrame, SourceError> {
        let df = self
            .tables
            .get(request.table())
            .ok_or_else(|| SourceError::TableNotFound(request.table().to_string()))?;
        apply_request(df.clone(), request)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetches_inserted_table() {
        let source = MemorySource::new().with_table("T", df! { "a" => &[1, 2, 3] }.unwrap());
        assert_eq!(source.fetch(&TableRequest::new("T")).unwrap().height(), 3);
        assert!(source.fetch(&TableRequest::new("U")).is_err());
    }
}

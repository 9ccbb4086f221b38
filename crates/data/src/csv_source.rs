use std::path::{Path, PathBuf};

use factortest_traits::{DataSource, SourceError, TableRequest};
use polars::prelude::*;

use crate::apply_request;

/// Directory of vendor table dumps, one `<TABLE>.csv` per table.
///
/// Every column is read as text so vendor date and code formats survive
/// untouched until the schema layer canonicalises them.
#[derive(Debug, Clone)]
pub struct CsvSource {
    root: PathBuf,
}

impl CsvSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.csv"))
    }

    fn read_table(&self, table: &str) -> Result<DataFrame, SourceError> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(SourceError::TableNotFound(table.to_string()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path))?
            .finish()?;
        Ok(df)
    }
}

impl DataSource for CsvSource {
    fn fetch(&self, request: &TableRequest) -> Result<DataFrame, SourceError> {
        let df = self.read_table(request.table())?;
        tracing::debug!(table = request.table(), rows = df.height(), "read csv table");
        apply_request(df, request)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use factortest_traits::Filter;

    use super::*;

    #[test]
    fn reads_all_columns_as_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("AINDEXMEMBERS.csv"),
            "S_INFO_WINDCODE,S_CON_WINDCODE,S_CON_INDATE,S_CON_OUTDATE\n\
             000852.SH,600000.SH,20141017,\n\
             000852.SH,000001.SZ,20141017,20150101.0\n\
             000905.SH,600000.SH,20070115,\n",
        )
        .unwrap();

        let source = CsvSource::new(dir.path());
        let request = TableRequest::new("AINDEXMEMBERS")
            .filter(Filter::equals("S_INFO_WINDCODE", "000852.SH"));
        let df = source.fetch(&request).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("S_CON_INDATE").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("S_CON_OUTDATE").unwrap().null_count(), 1);
    }

    #[test]
    fn missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::new(dir.path());
        assert!(matches!(
            source.fetch(&TableRequest::new("NOPE")),
            Err(SourceError::TableNotFound(t)) if t == "NOPE"
        ));
    }
}

//! Loader for the static industry prefix table.

use std::{fs::File, io::Read, path::Path};

use csv::ReaderBuilder;
use factortest_primitives::{PrefixEntry, PrefixTable};
use serde::Deserialize;

use crate::{DataError, Result};

#[derive(Debug, Deserialize)]
struct PrefixRow {
    #[serde(rename = "INDUSTRIESCODE_PREFIX")]
    prefix: String,
    #[serde(rename = "WIND_NAME_ENG")]
    category: String,
}

/// Read a prefix table from CSV, keeping row order.
///
/// The file needs `INDUSTRIESCODE_PREFIX` and `WIND_NAME_ENG` columns; other
/// columns are ignored. Prefixes are read as text.
///
/// # Errors
/// Returns a CSV error for malformed rows and `DataError::Parse` for an
/// empty prefix, which would match every code.
pub fn read_prefix_table<R: Read>(reader: R) -> Result<PrefixTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut entries = Vec::new();
    for (row, record) in reader.deserialize::<PrefixRow>().enumerate() {
        let record = record?;
        let prefix = record.prefix.trim();
        if prefix.is_empty() {
            return Err(DataError::Parse(format!("empty industry prefix on row {}", row + 1)));
        }
        entries.push(PrefixEntry::new(prefix, record.category.trim()));
    }

    tracing::debug!(entries = entries.len(), "loaded prefix table");
    Ok(PrefixTable::new(entries))
}

/// Load a prefix table from a CSV file.
///
/// # Errors
/// See [`read_prefix_table`].
pub fn load_prefix_table(path: impl AsRef<Path>) -> Result<PrefixTable> {
    read_prefix_table(File::open(path)?)
}

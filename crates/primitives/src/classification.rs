//! Industry classification by code prefix.

use serde::{Deserialize, Serialize};

/// One row of the static classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixEntry {
    /// Code prefix, kept as text so leading digits survive.
    pub prefix: String,
    /// Category label assigned to codes starting with `prefix`.
    pub category: String,
}

impl PrefixEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(prefix: impl Into<String>, category: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), category: category.into() }
    }
}

/// Return the category of the first entry whose prefix starts `code`.
///
/// Entries are scanned in table order and the first match wins, even when a
/// later entry has a longer matching prefix.
#[must_use]
pub fn assign_category<'a>(code: &str, table: &'a [PrefixEntry]) -> Option<&'a str> {
    table.iter().find(|entry| code.starts_with(&entry.prefix)).map(|entry| entry.category.as_str())
}

/// Order-significant prefix-to-category table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixTable {
    entries: Vec<PrefixEntry>,
}

impl PrefixTable {
    /// Create a table from entries in their significant order.
    #[must_use]
    pub const fn new(entries: Vec<PrefixEntry>) -> Self {
        Self { entries }
    }

    /// Classify a code, first match in table order.
    #[must_use]
    pub fn assign(&self, code: &str) -> Option<&str> {
        assign_category(code, &self.entries)
    }

    /// Entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[PrefixEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PrefixEntry> for PrefixTable {
    fn from_iter<I: IntoIterator<Item = PrefixEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

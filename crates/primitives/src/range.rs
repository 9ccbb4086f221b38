//! Inclusive calendar date ranges.

use serde::{Deserialize, Serialize};

use crate::Date;

/// Compact vendor date format, e.g. `20100104`.
const COMPACT_FORMAT: &str = "%Y%m%d";

/// Inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Create a range, returning `None` when `start > end`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Parse a range from two compact `YYYYMMDD` strings.
    ///
    /// # Errors
    /// Returns the chrono parse error of the first malformed bound. A well
    /// formed but inverted range yields `Ok(None)`.
    pub fn parse_compact(start: &str, end: &str) -> Result<Option<Self>, chrono::ParseError> {
        let start = Date::parse_from_str(start, COMPACT_FORMAT)?;
        let end = Date::parse_from_str(end, COMPACT_FORMAT)?;
        Ok(Self::new(start, end))
    }

    /// First date of the range.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Last date of the range.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Check whether `date` lies inside the range (both ends inclusive).
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Bounds formatted as compact `YYYYMMDD` strings, as the vendor stores them.
    #[must_use]
    pub fn to_compact(&self) -> (String, String) {
        (
            self.start.format(COMPACT_FORMAT).to_string(),
            self.end.format(COMPACT_FORMAT).to_string(),
        )
    }
}

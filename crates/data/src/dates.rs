//! Vendor date parsing.
//!
//! Vendor tables store dates as `YYYYMMDD` text or integers, and columns
//! holding nulls sometimes come back float-formatted (`20150101.0`).
//! Anything that does not parse becomes null, which downstream reads as an
//! open interval end.

use factortest_primitives::Date;
use polars::prelude::*;

/// Parse one vendor date value.
#[must_use]
pub fn parse_vendor_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    let head = trimmed.split(['.', ' ', 'T']).next()?;

    if head.len() == 8 && head.bytes().all(|b| b.is_ascii_digit()) {
        Date::parse_from_str(head, "%Y%m%d").ok()
    } else {
        Date::parse_from_str(head, "%Y-%m-%d").ok()
    }
}

/// Replace column `name` of `df` with its parsed `Date` form.
///
/// # Errors
/// Returns a polars error if the column is missing or cannot be cast to text.
pub fn parse_date_column(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    let parsed: Vec<Option<Date>> = {
        let as_text = df.column(name)?.cast(&DataType::String)?;
        as_text.str()?.into_iter().map(|v| v.and_then(parse_vendor_date)).collect()
    };
    df.with_column(Column::new(name.into(), parsed))?;
    Ok(())
}

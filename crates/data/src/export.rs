use std::{fs::File, path::Path};

use factortest_primitives::{Date, columns, to_epoch_days};
use polars::prelude::*;

use crate::Result;

/// Write the panel rows dated on any of `dates` to a CSV file.
///
/// Returns the number of rows written.
///
/// # Errors
/// Fails if the panel has no date column or the file cannot be written.
pub fn export_sample(panel: &DataFrame, dates: &[Date], path: impl AsRef<Path>) -> Result<usize> {
    let wanted: Vec<i32> = dates.iter().copied().map(to_epoch_days).collect();
    let days = panel.column(columns::DATE)?.cast(&DataType::Int32)?;
    let mask: BooleanChunked =
        days.i32()?.into_iter().map(|d| d.is_some_and(|d| wanted.contains(&d))).collect();

    let mut sample = panel.filter(&mask)?;
    export_csv(&mut sample, path)
}

/// Write a frame to a CSV file with a header row.
///
/// Returns the number of rows written.
///
/// # Errors
/// Fails if the file cannot be created or a column cannot be serialised.
pub fn export_csv(frame: &mut DataFrame, path: impl AsRef<Path>) -> Result<usize> {
    let mut file = File::create(path.as_ref())?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;

    tracing::info!(rows = frame.height(), path = %path.as_ref().display(), "exported csv");
    Ok(frame.height())
}

//! Information coefficients between a factor and forward returns.

use derive_more::Display;
use factortest_math::{pearson, spearman};
use factortest_primitives::{Date, columns::DATE, from_epoch_days};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, error::require_columns};

/// Summary statistics of a per-date coefficient series.
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[display("mean {mean:.4} std {std:.4} ir {icir:.4} positive {positive_share:.4} dates {dates}")]
pub struct IcSummary {
    /// Number of dates with a defined coefficient.
    pub dates: usize,
    /// Mean coefficient.
    pub mean: f64,
    /// Sample standard deviation of the coefficient.
    pub std: f64,
    /// `mean / std`.
    pub icir: f64,
    /// Share of dates with a positive coefficient.
    pub positive_share: f64,
}

impl IcSummary {
    /// Summarise a coefficient series, ignoring non-finite values.
    ///
    /// # Errors
    /// Returns `InsufficientData` with fewer than two finite values.
    pub fn from_series(values: &[f64]) -> Result<Self, AnalysisError> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n = finite.len();
        if n < 2 {
            return Err(AnalysisError::InsufficientData { required: 2, actual: n });
        }

        let mean = finite.iter().sum::<f64>() / n as f64;
        let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = var.sqrt();
        let positive = finite.iter().filter(|v| **v > 0.0).count();

        Ok(Self {
            dates: n,
            mean,
            std,
            icir: mean / std,
            positive_share: positive as f64 / n as f64,
        })
    }
}

/// Per-date coefficients and their summaries.
#[derive(Debug, Clone)]
pub struct IcReport {
    /// One row per date: `date`, `ic` (Pearson) and `rank_ic` (Spearman),
    /// null where undefined.
    pub series: DataFrame,
    /// Summary of the Pearson series.
    pub ic: IcSummary,
    /// Summary of the Spearman series.
    pub rank_ic: IcSummary,
}

/// Correlate `factor_col` with `return_col` within each date.
///
/// Only rows where both values are finite take part. A date with fewer than
/// two such rows, or a constant side, has no coefficient.
///
/// # Errors
/// Returns `MissingColumn` for an absent column and `InsufficientData` when
/// fewer than two dates have a coefficient.
pub fn information_coefficients(
    panel: &DataFrame,
    factor_col: &str,
    return_col: &str,
) -> Result<IcReport, AnalysisError> {
    require_columns(panel, &[DATE, factor_col, return_col])?;

    let sorted = panel.sort([DATE], SortMultipleOptions::default().with_maintain_order(true))?;
    let days: Vec<Option<i32>> =
        sorted.column(DATE)?.cast(&DataType::Int32)?.i32()?.into_iter().collect();
    let factor: Vec<Option<f64>> =
        sorted.column(factor_col)?.cast(&DataType::Float64)?.f64()?.into_iter().collect();
    let returns: Vec<Option<f64>> =
        sorted.column(return_col)?.cast(&DataType::Float64)?.f64()?.into_iter().collect();

    let mut dates: Vec<Option<Date>> = Vec::new();
    let mut ic: Vec<Option<f64>> = Vec::new();
    let mut rank_ic: Vec<Option<f64>> = Vec::new();

    let mut start = 0;
    while start < days.len() {
        let day = days[start];
        let end = start + days[start..].iter().take_while(|d| **d == day).count();
        if let Some(day) = day {
            let (x, y): (Vec<f64>, Vec<f64>) = (start..end)
                .filter_map(|row| match (factor[row], returns[row]) {
                    (Some(f), Some(r)) if f.is_finite() && r.is_finite() => Some((f, r)),
                    _ => None,
                })
                .unzip();
            dates.push(from_epoch_days(day));
            ic.push(pearson(&x, &y));
            rank_ic.push(spearman(&x, &y));
        }
        start = end;
    }

    let ic_values: Vec<f64> = ic.iter().flatten().copied().collect();
    let rank_values: Vec<f64> = rank_ic.iter().flatten().copied().collect();
    let summary = IcSummary::from_series(&ic_values)?;
    let rank_summary = IcSummary::from_series(&rank_values)?;
    tracing::info!(
        dates = dates.len(),
        mean_ic = summary.mean,
        mean_rank_ic = rank_summary.mean,
        "computed information coefficients"
    );

    let series = DataFrame::new(vec![
        Column::new(DATE.into(), dates),
        Column::new("ic".into(), ic),
        Column::new("rank_ic".into(), rank_ic),
    ])?;
    Ok(IcReport { series, ic: summary, rank_ic: rank_summary })
}

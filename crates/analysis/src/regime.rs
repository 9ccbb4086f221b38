//! Performance of a return series inside and outside regime years.

use chrono::Datelike;
use derive_more::Display;
use factortest_primitives::{
    columns::{DATE, INDEX_CLOSE, INDEX_PRE_CLOSE, RETURN, SYMBOL},
    from_epoch_days,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, error::require_columns};

/// Annualisation factor for daily series.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calendar years of low CPI inflation in China used as the default regime.
pub const LOW_INFLATION_YEARS: [i32; 11] =
    [2001, 2002, 2009, 2012, 2013, 2014, 2015, 2020, 2021, 2023, 2024];

/// Performance of a compounded daily return series.
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[display(
    "days {days} total {total_return:.4} ann {annualized_return:.4} vol {annualized_volatility:.4} sharpe {sharpe:.4} mdd {max_drawdown:.4}"
)]
pub struct PerformanceMetrics {
    /// Number of daily returns.
    pub days: usize,
    /// Final NAV minus one.
    pub total_return: f64,
    /// Geometric annual return.
    pub annualized_return: f64,
    /// Annualised sample standard deviation.
    pub annualized_volatility: f64,
    /// Annualised mean return over annualised volatility, zero risk-free rate.
    pub sharpe: f64,
    /// Largest peak-to-trough NAV loss, as a positive fraction.
    pub max_drawdown: f64,
}

impl PerformanceMetrics {
    /// Compute metrics from daily returns in time order, starting from NAV 1.
    ///
    /// Non-finite returns are skipped.
    ///
    /// # Errors
    /// Returns `InsufficientData` with fewer than two finite returns.
    pub fn from_returns(returns: &[f64]) -> Result<Self, AnalysisError> {
        let returns: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
        let n = returns.len();
        if n < 2 {
            return Err(AnalysisError::InsufficientData { required: 2, actual: n });
        }

        let mut nav = 1.0_f64;
        let mut peak = 1.0_f64;
        let mut max_drawdown = 0.0_f64;
        for r in &returns {
            nav *= 1.0 + r;
            peak = peak.max(nav);
            max_drawdown = max_drawdown.max(1.0 - nav / peak);
        }

        let mean = returns.iter().sum::<f64>() / n as f64;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let annualized_volatility = var.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();

        Ok(Self {
            days: n,
            total_return: nav - 1.0,
            annualized_return: nav.powf(TRADING_DAYS_PER_YEAR / n as f64) - 1.0,
            annualized_volatility,
            sharpe: mean * TRADING_DAYS_PER_YEAR / annualized_volatility,
            max_drawdown,
        })
    }
}

/// Metrics of the in-regime days, the remaining days and the full sample.
///
/// In- and out-of-regime series are compounded over their own days only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimePerformance {
    /// Days in a regime year.
    pub in_regime: PerformanceMetrics,
    /// Days outside every regime year.
    pub out_of_regime: PerformanceMetrics,
    /// Every day.
    pub full: PerformanceMetrics,
}

/// Daily returns `close / pre_close - 1` of one series in an index frame,
/// sorted by date.
///
/// # Errors
/// Returns `MissingColumn` for an absent column.
pub fn daily_returns(frame: &DataFrame, code: &str) -> Result<DataFrame, AnalysisError> {
    require_columns(frame, &[SYMBOL, DATE, INDEX_CLOSE, INDEX_PRE_CLOSE])?;

    let returns = frame
        .clone()
        .lazy()
        .filter(col(SYMBOL).eq(lit(code)))
        .sort([DATE], SortMultipleOptions::default().with_maintain_order(true))
        .select([
            col(DATE),
            (col(INDEX_CLOSE).cast(DataType::Float64)
                / col(INDEX_PRE_CLOSE).cast(DataType::Float64)
                - lit(1.0))
            .alias(RETURN),
        ])
        .collect()?;
    Ok(returns)
}

/// Split a daily `return` series by whether its date falls in `years`.
///
/// # Errors
/// Returns `MissingColumn` for an absent column and `InsufficientData` when
/// either side has fewer than two returns.
pub fn regime_performance(
    returns: &DataFrame,
    years: &[i32],
) -> Result<RegimePerformance, AnalysisError> {
    require_columns(returns, &[DATE, RETURN])?;

    let sorted = returns.sort([DATE], SortMultipleOptions::default().with_maintain_order(true))?;
    let days = sorted.column(DATE)?.cast(&DataType::Int32)?;
    let values = sorted.column(RETURN)?.cast(&DataType::Float64)?;

    let mut inside = Vec::new();
    let mut outside = Vec::new();
    let mut full = Vec::new();
    for (day, value) in days.i32()?.into_iter().zip(values.f64()?) {
        let (Some(year), Some(value)) = (day.and_then(from_epoch_days).map(|d| d.year()), value)
        else {
            continue;
        };
        full.push(value);
        if years.contains(&year) { inside.push(value) } else { outside.push(value) }
    }

    let performance = RegimePerformance {
        in_regime: PerformanceMetrics::from_returns(&inside)?,
        out_of_regime: PerformanceMetrics::from_returns(&outside)?,
        full: PerformanceMetrics::from_returns(&full)?,
    };
    tracing::info!(
        in_days = performance.in_regime.days,
        out_days = performance.out_of_regime.days,
        "computed regime performance"
    );
    Ok(performance)
}

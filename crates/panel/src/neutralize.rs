//! Market-value neutralisation.
//!
//! Within each trading date the target is regressed on an intercept and the
//! log of the control column. The residual replaces the target.

use std::ops::Range;

use factortest_math::{design_with_intercept, ordinary_least_squares};
use factortest_primitives::{Date, columns::DATE, from_epoch_days};
use ndarray::Array1;
use polars::prelude::*;

use crate::{NeutralizeConfig, PanelError, require_columns};

#[derive(Debug, Default)]
struct Fitted {
    rows: Vec<IdxSize>,
    residuals: Vec<f64>,
    log_control: Vec<f64>,
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PanelError> {
    Ok(df.column(name)?.cast(&DataType::Float64)?.f64()?.into_iter().collect())
}

/// Per-date OLS residualisation against log market value.
#[derive(Debug, Clone)]
pub struct Neutralizer {
    config: NeutralizeConfig,
}

impl Neutralizer {
    /// Create a neutraliser with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self { config: NeutralizeConfig::default() }
    }

    /// Create a neutraliser with custom configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if fewer than two observations would be fitted.
    pub fn with_config(config: NeutralizeConfig) -> Result<Self, PanelError> {
        if config.min_observations < 2 {
            return Err(PanelError::InvalidConfig(format!(
                "min_observations must be at least 2, got {}",
                config.min_observations
            )));
        }
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &NeutralizeConfig {
        &self.config
    }

    /// Replace `target` with its residual from a per-date regression on
    /// `[1, ln(control)]`, adding the log control column.
    ///
    /// Values are coerced to `f64` first. Rows whose target or control is
    /// missing or non-numeric, or whose control has no real logarithm, are
    /// dropped, as are rows whose date is null or outside the calendar. A date
    /// with fewer than `min_observations` remaining rows, or
    /// with a singular design, gets NaN residuals. The output is sorted by
    /// date with input order kept inside each date.
    ///
    /// # Errors
    /// Returns `DataIntegrity` if an infinite target or log control survives
    /// the coercion, and `MissingColumn` for an absent column.
    pub fn neutralize(&self, panel: DataFrame, target: &str) -> Result<DataFrame, PanelError> {
        let control = self.config.control_column.as_str();
        require_columns(&panel, &[DATE, target, control])?;
        let rows_in = panel.height();

        let sorted = panel.sort([DATE], SortMultipleOptions::default().with_maintain_order(true))?;
        let days: Vec<Option<i32>> =
            sorted.column(DATE)?.cast(&DataType::Int32)?.i32()?.into_iter().collect();
        let y = float_values(&sorted, target)?;
        let mv = float_values(&sorted, control)?;

        let mut fitted = Fitted::default();
        let mut start = 0;
        while start < days.len() {
            let day = days[start];
            let end = start + days[start..].iter().take_while(|d| **d == day).count();
            match day.map(|day| (day, from_epoch_days(day))) {
                Some((_, Some(date))) => self.fit_date(date, start..end, &y, &mv, &mut fitted)?,
                Some((day, None)) => tracing::warn!(
                    epoch_day = day,
                    rows = end - start,
                    "date outside the calendar, dropping its rows"
                ),
                None => {}
            }
            start = end;
        }

        let rows = IdxCa::from_vec("rows".into(), fitted.rows);
        let mut out = sorted.take(&rows)?;
        out.with_column(Column::new(target.into(), fitted.residuals))?;
        out.with_column(Column::new(
            self.config.output_log_column.as_str().into(),
            fitted.log_control,
        ))?;

        tracing::info!(rows_in, rows_out = out.height(), target, control, "neutralised factor");
        Ok(out)
    }

    fn fit_date(
        &self,
        date: Date,
        rows: Range<usize>,
        y: &[Option<f64>],
        mv: &[Option<f64>],
        fitted: &mut Fitted,
    ) -> Result<(), PanelError> {
        let mut kept = Vec::with_capacity(rows.len());
        let mut target = Vec::with_capacity(rows.len());
        let mut log_control = Vec::with_capacity(rows.len());

        for row in rows {
            let (Some(t), Some(m)) = (y[row], mv[row]) else { continue };
            let ln_m = m.ln();
            if t.is_nan() || ln_m.is_nan() {
                continue;
            }
            if !t.is_finite() || !ln_m.is_finite() {
                return Err(PanelError::DataIntegrity {
                    date,
                    reason: format!("non-finite regression input: target {t}, log control {ln_m}"),
                });
            }
            kept.push(row as IdxSize);
            target.push(t);
            log_control.push(ln_m);
        }

        let n = target.len();
        let residuals = if n < self.config.min_observations {
            tracing::warn!(%date, observations = n, "cross-section too small to neutralise");
            vec![f64::NAN; n]
        } else {
            let y = Array1::from_vec(target);
            let x = design_with_intercept(&Array1::from_vec(log_control.clone()));
            match ordinary_least_squares(&y, &x) {
                Ok(fit) => fit.residuals.to_vec(),
                Err(err) if err.is_degenerate() => {
                    tracing::warn!(
                        %date,
                        observations = n,
                        error = %err,
                        "singular neutralisation design"
                    );
                    vec![f64::NAN; n]
                }
                Err(err) => return Err(err.into()),
            }
        };

        fitted.rows.extend(kept);
        fitted.residuals.extend(residuals);
        fitted.log_control.extend(log_control);
        Ok(())
    }
}

impl Default for Neutralizer {
    fn default() -> Self {
        Self::new()
    }
}

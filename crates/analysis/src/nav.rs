//! Benchmark returns and net asset value curves.

use factortest_primitives::columns::{DATE, NAV, PCT_CHANGE, RETURN};
use polars::prelude::*;

use crate::{AnalysisError, error::require_columns};

/// Daily returns from a vendor percent-change column, sorted by date.
///
/// `pct_change` is in percent units, so `1.5` becomes a `0.015` return.
///
/// # Errors
/// Returns `MissingColumn` for an absent column.
pub fn pct_change_returns(frame: &DataFrame) -> Result<DataFrame, AnalysisError> {
    require_columns(frame, &[DATE, PCT_CHANGE])?;

    let returns = frame
        .clone()
        .lazy()
        .sort([DATE], SortMultipleOptions::default().with_maintain_order(true))
        .select([
            col(DATE),
            (col(PCT_CHANGE).cast(DataType::Float64) * lit(0.01)).alias(RETURN),
        ])
        .collect()?;
    Ok(returns)
}

/// Add a `nav` column compounding `return` in date order from 1.
///
/// A missing or non-finite return leaves the NAV unchanged for that day.
///
/// # Errors
/// Returns `MissingColumn` for an absent column.
pub fn net_asset_value(returns: &DataFrame) -> Result<DataFrame, AnalysisError> {
    require_columns(returns, &[DATE, RETURN])?;

    let mut sorted =
        returns.sort([DATE], SortMultipleOptions::default().with_maintain_order(true))?;
    let values = sorted.column(RETURN)?.cast(&DataType::Float64)?;

    let nav: Vec<f64> = values
        .f64()?
        .into_iter()
        .scan(1.0_f64, |nav, r| {
            if let Some(r) = r.filter(|r| r.is_finite()) {
                *nav *= 1.0 + r;
            }
            Some(*nav)
        })
        .collect();

    if let Some(last) = nav.last() {
        tracing::debug!(days = nav.len(), nav = *last, "compounded net asset value");
    }
    sorted.with_column(Column::new(NAV.into(), nav))?;
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use factortest_primitives::{Date, columns::SYMBOL};

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2010, 1, day).unwrap()
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn percent_units_are_scaled() {
        let frame = df! {
            SYMBOL => &["8841388.WI"; 3],
            DATE => &[d(6), d(4), d(5)],
            PCT_CHANGE => &["-2", "1.5", "10"],
        }
        .unwrap();

        let returns = pct_change_returns(&frame).unwrap();

        let names: Vec<&str> = returns.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec![DATE, RETURN]);
        let values: Vec<f64> = floats(&returns, RETURN).into_iter().flatten().collect();
        assert_relative_eq!(values[0], 0.015, epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(values[2], -0.02, epsilon = 1e-12);
    }

    #[test]
    fn nav_is_cumulative_product() {
        let returns = df! {
            DATE => &[d(5), d(4), d(6), d(7)],
            RETURN => &[Some(-0.5), Some(0.1), None, Some(0.2)],
        }
        .unwrap();

        let nav = net_asset_value(&returns).unwrap();

        let values: Vec<f64> = floats(&nav, NAV).into_iter().flatten().collect();
        assert_eq!(values.len(), 4);
        assert_relative_eq!(values[0], 1.1, epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.55, epsilon = 1e-12);
        assert_relative_eq!(values[2], 0.55, epsilon = 1e-12);
        assert_relative_eq!(values[3], 0.66, epsilon = 1e-12);
    }

    #[test]
    fn benchmark_curve_from_vendor_percent() {
        let frame = df! {
            DATE => &[d(4), d(5)],
            PCT_CHANGE => &[1.0, -1.0],
        }
        .unwrap();

        let nav = net_asset_value(&pct_change_returns(&frame).unwrap()).unwrap();

        let values: Vec<f64> = floats(&nav, NAV).into_iter().flatten().collect();
        assert_relative_eq!(values[1], 1.01 * 0.99, epsilon = 1e-12);
    }

    #[test]
    fn missing_pct_change_is_rejected() {
        let frame = df! { DATE => &[d(4)] }.unwrap();
        assert!(matches!(
            pct_change_returns(&frame),
            Err(AnalysisError::MissingColumn(column)) if column == PCT_CHANGE
        ));
    }
}

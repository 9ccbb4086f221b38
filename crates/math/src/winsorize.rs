//! Per-date percentile clipping for outlier handling.

use polars::prelude::*;

use crate::MathError;

fn validate_tail(fraction: f64) -> Result<(), MathError> {
    if (0.0..0.5).contains(&fraction) { Ok(()) } else { Err(MathError::InvalidPercentile(fraction)) }
}

/// Expression clipping `target_col` to its per-group percentile bounds.
///
/// Bounds use linear interpolation between order statistics. Nulls stay null
/// and take no part in the bounds.
///
/// # Arguments
/// * `target_col` - Column to winsorize
/// * `group_col` - Column to partition by (typically "date")
/// * `lower` - Lower tail fraction
/// * `upper` - Upper tail fraction
pub fn winsorize_expr(target_col: &str, group_col: &str, lower: f64, upper: f64) -> Expr {
    let value = col(target_col).cast(DataType::Float64);
    let lower_bound =
        value.clone().quantile(lit(lower), QuantileMethod::Linear).over([col(group_col)]);
    let upper_bound =
        value.clone().quantile(lit(1.0 - upper), QuantileMethod::Linear).over([col(group_col)]);

    when(value.clone().lt(lower_bound.clone()))
        .then(lower_bound)
        .when(value.clone().gt(upper_bound.clone()))
        .then(upper_bound)
        .otherwise(value)
}

/// Validated tail fractions for [`winsorize_expr`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Winsorizer {
    lower: f64,
    upper: f64,
}

impl Winsorizer {
    /// Create a new winsorizer.
    ///
    /// # Arguments
    /// * `lower` - Lower tail fraction, must be in [0, 0.5)
    /// * `upper` - Upper tail fraction, must be in [0, 0.5)
    ///
    /// # Errors
    /// Returns `MathError::InvalidPercentile` if a tail is out of range.
    pub fn new(lower: f64, upper: f64) -> Result<Self, MathError> {
        validate_tail(lower)?;
        validate_tail(upper)?;
        Ok(Self { lower, upper })
    }

    /// Lower tail fraction.
    #[must_use]
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper tail fraction.
    #[must_use]
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Per-group winsorization expression.
    #[must_use]
    pub fn expr(&self, target_col: &str, group_col: &str) -> Expr {
        winsorize_expr(target_col, group_col, self.lower, self.upper)
    }
}

//! Cross-sectional statistical operations.

use polars::prelude::*;

/// Cross-sectional z-score with an explicit degrees-of-freedom correction.
///
/// `ddof = 0` divides by the population standard deviation. A group whose
/// standard deviation is zero or undefined yields NaN or null.
pub fn zscore_xsection(target_col: &str, over_col: &str, ddof: u8) -> Expr {
    let value = col(target_col).cast(DataType::Float64);
    (value.clone() - value.clone().mean().over([col(over_col)]))
        / value.std(ddof).over([col(over_col)])
}

//! Data transformation trait definitions.

use polars::prelude::*;

/// Cross-sectional data transformation.
///
/// Operates on data partitioned by date, transforming values across entities.
pub trait CrossSectionTransform: Send + Sync {
    /// Transform target column, partitioned by group column.
    ///
    /// # Arguments
    /// * `target_col` - Column to transform
    /// * `group_col` - Column to partition by (typically "date")
    ///
    /// # Returns
    /// Polars expression representing the transformation.
    fn transform(&self, target_col: &str, group_col: &str) -> Expr;

    /// Returns the name of this transformation.
    fn name(&self) -> &str;
}

/// Time-series data transformation.
///
/// Operates on each entity's own series; callers sort by time within the
/// partition before evaluating the expression.
pub trait TimeSeriesTransform: Send + Sync {
    /// Transform target column within each partition.
    ///
    /// # Arguments
    /// * `target_col` - Column to transform
    /// * `partition_col` - Column to partition by (typically "symbol")
    ///
    /// # Returns
    /// Polars expression representing the transformation.
    fn transform(&self, target_col: &str, partition_col: &str) -> Expr;

    /// Returns the name of this transformation.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Demean;

    impl CrossSectionTransform for Demean {
        fn transform(&self, target_col: &str, group_col: &str) -> Expr {
            (col(target_col) - col(target_col).mean().over([col(group_col)])).alias(target_col)
        }

        fn name(&self) -> &str {
            "demean"
        }
    }

    #[test]
    fn cross_section_transform_is_per_group() {
        let df = df! {
            "date" => &[1, 1, 2, 2],
            "value" => &[1.0, 3.0, 10.0, 30.0],
        }
        .unwrap();

        let out = df
            .lazy()
            .with_column(Demean.transform("value", "date"))
            .collect()
            .unwrap();

        let values: Vec<f64> =
            out.column("value").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(values, vec![-1.0, 1.0, -10.0, 10.0]);
        assert_eq!(Demean.name(), "demean");
    }
}

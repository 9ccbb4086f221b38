//! Same-day and forward returns.

use factortest_primitives::columns::{CLOSE, DATE, FORWARD_RETURN, PRE_CLOSE, RETURN, SYMBOL};
use factortest_traits::TimeSeriesTransform;
use polars::prelude::*;

use crate::{PanelError, require_columns};

/// One-step lead of a column within each entity's own series.
///
/// The lead is positional: a gap in the entity's dates is skipped over, not
/// filled. Rows must be sorted by date within each partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardReturn;

impl TimeSeriesTransform for ForwardReturn {
    fn transform(&self, target_col: &str, partition_col: &str) -> Expr {
        col(target_col).shift(lit(-1)).over([col(partition_col)])
    }

    fn name(&self) -> &str {
        "forward_return"
    }
}

/// Add `return = adj_close / adj_pre_close - 1` and its one-step lead
/// `forward_return`, dropping rows without a forward return.
///
/// The output is sorted by entity, then date.
///
/// # Errors
/// Returns `MissingColumn` if a price or key column is absent.
pub fn add_forward_return(panel: DataFrame) -> Result<DataFrame, PanelError> {
    require_columns(&panel, &[SYMBOL, DATE, CLOSE, PRE_CLOSE])?;
    let rows_in = panel.height();

    let out = panel
        .lazy()
        .sort([SYMBOL, DATE], SortMultipleOptions::default().with_maintain_order(true))
        .with_column(
            (col(CLOSE).cast(DataType::Float64) / col(PRE_CLOSE).cast(DataType::Float64)
                - lit(1.0))
            .alias(RETURN),
        )
        .with_column(ForwardReturn.transform(RETURN, SYMBOL).alias(FORWARD_RETURN))
        .filter(col(FORWARD_RETURN).is_not_null().and(col(FORWARD_RETURN).is_not_nan()))
        .collect()?;

    tracing::info!(rows_in, rows_out = out.height(), "added forward returns");
    Ok(out)
}

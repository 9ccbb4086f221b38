//! Price quality filters.

use factortest_primitives::{
    Exchange,
    columns::{LIMIT_DOWN, LIMIT_UP, OPEN, SYMBOL, TRADE_STATUS},
};
use polars::prelude::*;

use crate::{PanelError, PriceFilterConfig, require_columns};

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PanelError> {
    Ok(df.column(name)?.cast(&DataType::Float64)?.f64()?.into_iter().collect())
}

/// Drop price rows that are outside the allowed exchanges, suspended, or
/// opened at a price limit.
///
/// A missing status, open or limit never causes a drop.
///
/// # Errors
/// Returns `MissingColumn` when a column needed by an enabled filter is absent.
pub fn apply_price_filters(
    prices: DataFrame,
    config: &PriceFilterConfig,
) -> Result<DataFrame, PanelError> {
    require_columns(&prices, &[SYMBOL])?;
    let rows_in = prices.height();

    let mut keep: Vec<bool> = prices
        .column(SYMBOL)?
        .str()?
        .into_iter()
        .map(|symbol| {
            symbol
                .and_then(Exchange::from_symbol)
                .is_some_and(|exchange| config.exchanges.contains(&exchange))
        })
        .collect();

    if config.drop_suspended {
        require_columns(&prices, &[TRADE_STATUS])?;
        let status = prices.column(TRADE_STATUS)?.str()?;
        for (k, s) in keep.iter_mut().zip(status) {
            *k &= s != Some(config.suspended_status.as_str());
        }
    }

    if config.drop_limit_open {
        require_columns(&prices, &[OPEN, LIMIT_UP, LIMIT_DOWN])?;
        let open = float_values(&prices, OPEN)?;
        let up = float_values(&prices, LIMIT_UP)?;
        let down = float_values(&prices, LIMIT_DOWN)?;
        for (i, k) in keep.iter_mut().enumerate() {
            let at_limit = |limit: Option<f64>| matches!((open[i], limit), (Some(o), Some(l)) if o == l);
            *k &= !(at_limit(up[i]) || at_limit(down[i]));
        }
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let filtered = prices.filter(&mask)?;
    tracing::info!(rows_in, rows_out = filtered.height(), "applied price filters");
    Ok(filtered)
}

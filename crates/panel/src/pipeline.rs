//! End-to-end panel construction.

use factortest_data::wind;
use factortest_primitives::{
    PrefixTable,
    columns::{DATE, INDEX_CODE, SYMBOL},
};
use factortest_traits::DataSource;
use polars::prelude::*;

use crate::{
    MembershipTable, Neutralizer, Normalizer, PanelError, PipelineConfig, add_forward_return,
    apply_price_filters, industry_membership, reconcile, require_columns,
};

/// Left-join indicator columns onto the panel on (symbol, date).
///
/// With `fill` set, a missing `factor_column` value after the join is
/// replaced by it.
///
/// # Errors
/// Returns `MissingColumn` if a key column or the factor column is absent.
pub fn merge_indicators(
    panel: DataFrame,
    indicators: DataFrame,
    factor_column: &str,
    fill: Option<f64>,
) -> Result<DataFrame, PanelError> {
    require_columns(&panel, &[SYMBOL, DATE])?;
    require_columns(&indicators, &[SYMBOL, DATE, factor_column])?;
    let rows_in = panel.height();

    let mut merged = panel.lazy().join(
        indicators.lazy(),
        [col(SYMBOL), col(DATE)],
        [col(SYMBOL), col(DATE)],
        JoinArgs::new(JoinType::Left),
    );
    if let Some(fill) = fill {
        merged = merged.with_column(col(factor_column).fill_null(lit(fill)));
    }
    let merged = merged.collect()?;

    tracing::info!(rows_in, rows_out = merged.height(), "merged indicators");
    Ok(merged)
}

/// Builds the cleaned research panel from a data source.
///
/// Stages, in order: price filters, index membership, industry
/// classification, indicator merge, forward return, normalisation and
/// neutralisation. The result is sorted by date, then symbol, and carries
/// `symbol`, `date`, the two group labels, `forward_return` and the
/// neutralised factor in [`factor_column`](Self::factor_column).
#[derive(Debug, Clone)]
pub struct PanelPipeline {
    config: PipelineConfig,
    prefixes: PrefixTable,
    normalizer: Normalizer,
    neutralizer: Neutralizer,
}

impl PanelPipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    /// Returns an error if the normalisation or neutralisation configuration
    /// is invalid.
    pub fn new(config: PipelineConfig, prefixes: PrefixTable) -> Result<Self, PanelError> {
        let normalizer = Normalizer::new(config.normalize)?;
        let neutralizer = Neutralizer::with_config(config.neutralize.clone())?;
        Ok(Self { config, prefixes, normalizer, neutralizer })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Column holding the neutralised factor.
    #[must_use]
    pub fn factor_column(&self) -> String {
        Normalizer::normalized_column(&self.config.factor_column)
    }

    /// Run every stage against `source`.
    ///
    /// # Errors
    /// Propagates source, schema and stage errors; a non-finite value reaching
    /// the neutralisation fit is a fatal `DataIntegrity` error.
    pub fn run<S>(&self, source: &S) -> Result<DataFrame, PanelError>
    where
        S: DataSource + ?Sized,
    {
        let range = self.config.range;

        let prices = wind::fetch_prices(source, range)?;
        let prices = apply_price_filters(prices, &self.config.price_filter)?;

        let members = wind::fetch_index_members(source, &self.config.index_code)?;
        let members = MembershipTable::new(&members, INDEX_CODE)?;
        let panel = reconcile(&prices, &members, &self.config.index)?;

        let classification = wind::fetch_industry_class(source)?;
        let industries = industry_membership(&classification, &self.prefixes)?;
        let panel = reconcile(&panel, &industries, &self.config.industry)?;

        let indicators = wind::fetch_indicators(source, range)?;
        let panel = merge_indicators(
            panel,
            indicators,
            &self.config.factor_column,
            self.config.fill_factor_nulls,
        )?;

        let panel = add_forward_return(panel)?;
        let panel = self.normalizer.normalize(panel, &self.config.factor_column)?;
        let panel = self.neutralizer.neutralize(panel, &self.factor_column())?;

        let panel =
            panel.sort([DATE, SYMBOL], SortMultipleOptions::default().with_maintain_order(true))?;
        tracing::info!(rows = panel.height(), index = %self.config.index_code, "panel ready");
        Ok(panel)
    }
}

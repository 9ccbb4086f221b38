//! Cross-sectional winsorisation and standardisation.

use factortest_math::{Winsorizer, zscore_xsection};
use factortest_primitives::columns::DATE;
use factortest_traits::CrossSectionTransform;
use polars::prelude::*;

use crate::{NormalizeConfig, PanelError, require_columns};

/// Per-group clipping to the configured tail percentiles.
#[derive(Debug, Clone, Copy)]
pub struct Winsorize(Winsorizer);

impl Winsorize {
    /// Wrap a configured winsorizer.
    #[must_use]
    pub const fn new(winsorizer: Winsorizer) -> Self {
        Self(winsorizer)
    }
}

impl CrossSectionTransform for Winsorize {
    fn transform(&self, target_col: &str, group_col: &str) -> Expr {
        self.0.expr(target_col, group_col)
    }

    fn name(&self) -> &str {
        "winsorize"
    }
}

/// Per-group z-score.
#[derive(Debug, Clone, Copy)]
pub struct Standardize {
    ddof: u8,
}

impl Standardize {
    /// Z-score with the given degrees-of-freedom correction.
    #[must_use]
    pub const fn new(ddof: u8) -> Self {
        Self { ddof }
    }
}

impl CrossSectionTransform for Standardize {
    fn transform(&self, target_col: &str, group_col: &str) -> Expr {
        zscore_xsection(target_col, group_col, self.ddof)
    }

    fn name(&self) -> &str {
        "zscore"
    }
}

/// Winsorises then z-scores a raw factor within each trading date.
///
/// Both stages are kept as columns: `{raw}_winsorized` and `{raw}_norm`. A
/// date with fewer than two non-null values has an undefined standard
/// deviation and yields NaN or null scores.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    config: NormalizeConfig,
    winsorize: Winsorize,
    standardize: Standardize,
}

impl Normalizer {
    /// Create a normaliser.
    ///
    /// # Errors
    /// Returns `PanelError::Math` if a tail fraction is outside `[0, 0.5)`.
    pub fn new(config: NormalizeConfig) -> Result<Self, PanelError> {
        let winsorizer = Winsorizer::new(config.lower_tail, config.upper_tail)?;
        Ok(Self {
            config,
            winsorize: Winsorize::new(winsorizer),
            standardize: Standardize::new(config.ddof),
        })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Name of the winsorised column for `raw`.
    #[must_use]
    pub fn winsorized_column(raw: &str) -> String {
        format!("{raw}_winsorized")
    }

    /// Name of the standardised column for `raw`.
    #[must_use]
    pub fn normalized_column(raw: &str) -> String {
        format!("{raw}_norm")
    }

    /// Add the winsorised and standardised columns of `raw`, grouped by date.
    ///
    /// # Errors
    /// Returns `MissingColumn` if `raw` or `date` is absent.
    pub fn normalize(&self, panel: DataFrame, raw: &str) -> Result<DataFrame, PanelError> {
        require_columns(&panel, &[DATE, raw])?;
        let winsorized = Self::winsorized_column(raw);
        let normalized = Self::normalized_column(raw);

        let degenerate = panel
            .clone()
            .lazy()
            .group_by([col(DATE)])
            .agg([col(raw).count().alias("n")])
            .filter(col("n").lt(lit(2)))
            .collect()?
            .height();
        if degenerate > 0 {
            tracing::warn!(
                dates = degenerate,
                column = raw,
                "cross-sections too small to standardise"
            );
        }

        let out = panel
            .lazy()
            .with_column(self.winsorize.transform(raw, DATE).alias(winsorized.as_str()))
            .with_column(self.standardize.transform(&winsorized, DATE).alias(normalized.as_str()))
            .collect()?;

        tracing::info!(rows = out.height(), column = raw, "normalised factor");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use factortest_primitives::{Date, columns::SYMBOL};

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2010, 1, day).unwrap()
    }

    fn values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name).unwrap().f64().unwrap().into_no_null_iter().collect()
    }

    #[test]
    fn outlier_is_clipped_then_standardised() {
        let panel = df! {
            SYMBOL => &["A", "B", "C", "D", "E"],
            DATE => &[d(4); 5],
            "turnover" => &[1.0, 2.0, 3.0, 4.0, 100.0],
        }
        .unwrap();
        let normalizer = Normalizer::new(NormalizeConfig::default()).unwrap();

        let out = normalizer.normalize(panel, "turnover").unwrap();

        let winsorized = values(&out, "turnover_winsorized");
        assert_relative_eq!(winsorized[4], 80.8, epsilon = 1e-9);
        assert_relative_eq!(winsorized[0], 1.2, epsilon = 1e-9);

        let norm = values(&out, "turnover_norm");
        let mean = norm.iter().sum::<f64>() / norm.len() as f64;
        let var = norm.iter().map(|z| (z - mean).powi(2)).sum::<f64>() / norm.len() as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(var, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn dates_are_independent() {
        let panel = df! {
            SYMBOL => &["A", "B", "A", "B"],
            DATE => &[d(4), d(4), d(5), d(5)],
            "turnover" => &[1.0, 3.0, 100.0, 300.0],
        }
        .unwrap();
        let normalizer = Normalizer::new(NormalizeConfig::default().with_tails(0.0)).unwrap();

        let out = normalizer.normalize(panel, "turnover").unwrap();

        for (z, expected) in values(&out, "turnover_norm").into_iter().zip([-1.0, 1.0, -1.0, 1.0]) {
            assert_relative_eq!(z, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_name_cross_section_is_undefined() {
        let panel = df! {
            SYMBOL => &["A"],
            DATE => &[d(4)],
            "turnover" => &[1.0],
        }
        .unwrap();
        let normalizer = Normalizer::new(NormalizeConfig::default()).unwrap();

        let out = normalizer.normalize(panel, "turnover").unwrap();

        let norm = out.column("turnover_norm").unwrap().f64().unwrap().get(0);
        assert!(norm.is_none_or(f64::is_nan));
    }

    #[test]
    fn invalid_tail_is_rejected() {
        let config = NormalizeConfig { lower_tail: 0.6, ..NormalizeConfig::default() };
        assert!(matches!(Normalizer::new(config), Err(PanelError::Math(_))));
    }
}

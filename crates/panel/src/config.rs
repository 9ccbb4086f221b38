//! Stage configuration.

use factortest_primitives::{DateRange, Exchange, columns};
use serde::{Deserialize, Serialize};

/// Configuration of one reconciliation against a membership table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Column receiving the group label of the matching interval.
    pub label_column: String,
    /// Attribute observations before the cutover date to the initial cohort.
    pub backfill_initial_cohort: bool,
}

impl ReconcileConfig {
    /// Index membership: labels `index_code` and backfills the initial cohort.
    #[must_use]
    pub fn index_membership() -> Self {
        Self { label_column: columns::INDEX_CODE.to_string(), backfill_initial_cohort: true }
    }

    /// Industry classification: labels `industry`, containment only.
    #[must_use]
    pub fn industry() -> Self {
        Self { label_column: columns::INDUSTRY.to_string(), backfill_initial_cohort: false }
    }

    /// Set the label column.
    #[must_use]
    pub fn with_label_column(mut self, label_column: impl Into<String>) -> Self {
        self.label_column = label_column.into();
        self
    }

    /// Enable or disable the initial cohort backfill.
    #[must_use]
    pub const fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill_initial_cohort = backfill;
        self
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self::index_membership()
    }
}

/// Configuration for cross-sectional winsorisation and standardisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Fraction clipped in the lower tail.
    pub lower_tail: f64,
    /// Fraction clipped in the upper tail.
    pub upper_tail: f64,
    /// Delta degrees of freedom of the standard deviation.
    pub ddof: u8,
}

impl NormalizeConfig {
    /// Set both tails to the same fraction.
    #[must_use]
    pub const fn with_tails(mut self, tail: f64) -> Self {
        self.lower_tail = tail;
        self.upper_tail = tail;
        self
    }

    /// Set the degrees-of-freedom correction.
    #[must_use]
    pub const fn with_ddof(mut self, ddof: u8) -> Self {
        self.ddof = ddof;
        self
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { lower_tail: 0.05, upper_tail: 0.05, ddof: 0 }
    }
}

/// Configuration for market-value neutralisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralizeConfig {
    /// Control variable, regressed on in log form.
    pub control_column: String,
    /// Column receiving the log of the control.
    pub output_log_column: String,
    /// Smallest cross-section that is fitted; smaller ones get NaN residuals.
    pub min_observations: usize,
}

impl NeutralizeConfig {
    /// Set the minimum cross-section size.
    #[must_use]
    pub const fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations;
        self
    }
}

impl Default for NeutralizeConfig {
    fn default() -> Self {
        Self {
            control_column: columns::MARKET_VALUE.to_string(),
            output_log_column: columns::LOG_MARKET_VALUE.to_string(),
            min_observations: 2,
        }
    }
}

/// Price quality filters applied before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFilterConfig {
    /// Allowed exchanges, read from the identifier suffix.
    pub exchanges: Vec<Exchange>,
    /// Drop rows whose trade status is the suspended marker.
    pub drop_suspended: bool,
    /// Drop rows that open at the limit-up or limit-down price.
    pub drop_limit_open: bool,
    /// Trade status text of a suspended session.
    pub suspended_status: String,
}

impl Default for PriceFilterConfig {
    fn default() -> Self {
        Self {
            exchanges: vec![Exchange::Shanghai, Exchange::Shenzhen],
            drop_suspended: true,
            drop_limit_open: true,
            suspended_status: "停牌".to_string(),
        }
    }
}

fn default_index_code() -> String {
    "000852.SH".to_string()
}

fn default_factor_column() -> String {
    columns::TURNOVER.to_string()
}

const fn default_fill() -> Option<f64> {
    Some(0.0)
}

fn default_industry() -> ReconcileConfig {
    ReconcileConfig::industry()
}

/// Configuration of the whole panel pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Trading dates to load.
    pub range: DateRange,
    /// Index whose constituents form the universe.
    #[serde(default = "default_index_code")]
    pub index_code: String,
    /// Raw factor column.
    #[serde(default = "default_factor_column")]
    pub factor_column: String,
    /// Value substituted for a missing raw factor after the indicator merge.
    #[serde(default = "default_fill")]
    pub fill_factor_nulls: Option<f64>,
    /// Index membership reconciliation.
    #[serde(default)]
    pub index: ReconcileConfig,
    /// Industry reconciliation.
    #[serde(default = "default_industry")]
    pub industry: ReconcileConfig,
    /// Cross-sectional normalisation.
    #[serde(default)]
    pub normalize: NormalizeConfig,
    /// Market-value neutralisation.
    #[serde(default)]
    pub neutralize: NeutralizeConfig,
    /// Price quality filters.
    #[serde(default)]
    pub price_filter: PriceFilterConfig,
}

impl PipelineConfig {
    /// Defaults for `range`: CSI 1000 universe, turnover factor.
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            index_code: default_index_code(),
            factor_column: default_factor_column(),
            fill_factor_nulls: default_fill(),
            index: ReconcileConfig::index_membership(),
            industry: ReconcileConfig::industry(),
            normalize: NormalizeConfig::default(),
            neutralize: NeutralizeConfig::default(),
            price_filter: PriceFilterConfig::default(),
        }
    }

    /// Set the universe index.
    #[must_use]
    pub fn with_index_code(mut self, index_code: impl Into<String>) -> Self {
        self.index_code = index_code.into();
        self
    }

    /// Set the raw factor column.
    #[must_use]
    pub fn with_factor_column(mut self, factor_column: impl Into<String>) -> Self {
        self.factor_column = factor_column.into();
        self
    }
}

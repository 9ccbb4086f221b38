#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factortest/factortest-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ic;
pub use ic::{IcReport, IcSummary, information_coefficients};

mod nav;
pub use nav::{net_asset_value, pct_change_returns};

mod regime;
pub use regime::{
    LOW_INFLATION_YEARS, PerformanceMetrics, RegimePerformance, TRADING_DAYS_PER_YEAR,
    daily_returns, regime_performance,
};

mod error;
pub use error::AnalysisError;

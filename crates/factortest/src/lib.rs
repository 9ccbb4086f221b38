//! # factortest
//!
//! Point-in-time factor research on A-share equities.
//!
//! This crate re-exports the factortest workspace behind feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Symbols, date ranges, column names, industry prefixes
//! - `traits`: Data source and transform abstractions
//! - `math`: Winsorisation, z-scores, least squares, correlations
//! - `data`: Wind table access, CSV sources, sample export
//! - `panel`: Interval reconciliation and the research panel pipeline
//! - `analysis`: Information coefficients, benchmark NAV and regime performance
//! - `cli`: The `research` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use factortest::{data::CsvSource, data::load_prefix_table, panel::prelude::*};
//!
//! let prefixes = load_prefix_table("wind_industry_prefix.csv")?;
//! let pipeline = PanelPipeline::new(PipelineConfig::new(range), prefixes)?;
//! let panel = pipeline.run(&CsvSource::new("data"))?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use factortest_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use factortest_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use factortest_math as math;
#[cfg(feature = "data")]
#[doc(inline)]
pub use factortest_data as data;
#[cfg(feature = "panel")]
#[doc(inline)]
pub use factortest_panel as panel;
#[cfg(feature = "analysis")]
#[doc(inline)]
pub use factortest_analysis as analysis;

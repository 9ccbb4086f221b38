#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factortest/factortest-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{
    NeutralizeConfig, NormalizeConfig, PipelineConfig, PriceFilterConfig, ReconcileConfig,
};

mod reconcile;
pub use reconcile::{MembershipTable, reconcile};

mod industry;
pub use industry::industry_membership;

mod filters;
pub use filters::apply_price_filters;

mod returns;
pub use returns::{ForwardReturn, add_forward_return};

mod normalize;
pub use normalize::{Normalizer, Standardize, Winsorize};

mod neutralize;
pub use neutralize::Neutralizer;

mod pipeline;
pub use pipeline::{PanelPipeline, merge_indicators};

mod error;
pub use error::PanelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use factortest_traits::{CrossSectionTransform, DataSource, TimeSeriesTransform};

    pub use super::{MembershipTable, PanelError, PanelPipeline, PipelineConfig, reconcile};
}

pub(crate) fn require_columns(
    df: &polars::prelude::DataFrame,
    names: &[&str],
) -> Result<(), PanelError> {
    match names.iter().find(|name| df.column(name).is_err()) {
        Some(name) => Err(PanelError::MissingColumn((*name).to_string())),
        None => Ok(()),
    }
}

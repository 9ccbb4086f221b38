#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factortest/factortest-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod cross_section;
pub use cross_section::zscore_xsection;

mod winsorize;
pub use winsorize::{Winsorizer, winsorize_expr};

mod linalg;
pub use linalg::{OlsResult, design_with_intercept, ordinary_least_squares, weighted_least_squares};

mod stats;
pub use stats::{average_ranks, pearson, spearman};

mod error;
pub use error::MathError;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factortest/factortest-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod columns;

mod asset;
pub use asset::{Exchange, Symbol};

mod range;
pub use range::DateRange;

mod epoch;
pub use epoch::{from_epoch_days, to_epoch_days};

mod classification;
pub use classification::{PrefixEntry, PrefixTable, assign_category};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

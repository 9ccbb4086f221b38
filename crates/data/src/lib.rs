#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factortest/factortest-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod dates;
pub use dates::{parse_date_column, parse_vendor_date};

mod request;
pub use request::apply_request;

mod csv_source;
pub use csv_source::CsvSource;

mod memory;
pub use memory::MemorySource;

pub mod wind;

mod prefix;
pub use prefix::{load_prefix_table, read_prefix_table};

mod export;
pub use export::{export_csv, export_sample};

mod error;
pub use error::{DataError, Result};

//! # Movement Summary
//!
//! Decodes fixed-width futures movement files and reports the net
//! transaction amount per client and product.
//!
//! ## Design Principles
//!
//! - **Byte-exact decoding**: 35 fields at fixed offsets, short lines tolerated
//! - **Exact arithmetic**: amounts summed as decimals via `rust_decimal`
//! - **Order-independent totals**: sequential, fork-join and chunked runs
//!   produce identical reports
//! - **Fail fast**: the first bad line aborts the run
//!
//! ## Example
//!
//! ```no_run
//! use movement_summary::{RunConfig, SummaryEngine};
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let config = RunConfig::builder().ignore_sign_indicators(false).build().unwrap();
//! let engine = SummaryEngine::new(config);
//! let report = engine.run(BufReader::new(File::open("Input.txt").unwrap())).unwrap();
//! report.write_csv(std::io::stdout()).unwrap();
//! ```

pub mod aggregate;
pub mod amount;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod key;
pub mod record;
pub mod report;

pub use aggregate::{Aggregate, ChunkProgress, Contribution};
pub use amount::net_amount;
pub use config::{RunConfig, RunConfigBuilder, Strategy};
pub use decimal::Amount;
pub use engine::SummaryEngine;
pub use error::{EngineError, RecordError, Result, SinkError};
pub use key::{normalize_product_key, GroupKey};
pub use record::{DecodedRecord, FieldSpec, LAYOUT, MIN_RECORD_LEN, RECORD_LEN};
pub use report::{CsvSink, JsonSink, OutputFormat, ReportRow, ReportSink, SummaryReport};

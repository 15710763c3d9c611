//! Output module for storing extracted records and summarizing runs
//!
//! This module handles:
//! - The sink contract records are written through
//! - CSV files, one per category page
//! - The end-of-run report

mod csv_sink;
pub mod report;
mod traits;

pub use csv_sink::{render_csv, CsvSink};
pub use report::{print_report, RunReport, TargetOutcome};
pub use traits::{OutputError, OutputResult, ProductSink};

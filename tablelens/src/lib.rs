//! # TableLens - Automatic Exploratory Data Analysis for Rust
//!
//! TableLens profiles a tabular dataset with zero manual configuration:
//! hand it an Arrow `RecordBatch` and it runs a fixed battery of analysis
//! passes, returning a single structured [`Report`](report::Report) with
//! descriptive statistics, missing-value profiles, correlation structure,
//! outlier detection, distribution characterization, categorical
//! summaries, time-pattern detection, chart artifacts and free-text
//! insights.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{Float64Array, StringArray};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use tablelens::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("age", DataType::Float64, true),
//!     Field::new("city", DataType::Utf8, true),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(Float64Array::from(vec![Some(25.0), Some(30.0), None])),
//!         Arc::new(StringArray::from(vec!["Lisbon", "Porto", "Lisbon"])),
//!     ],
//! )?;
//!
//! let table = Table::new("customers", batch);
//! let mut profiler = Profiler::builder()
//!     .output_dir(std::env::temp_dir().join("tablelens_charts"))
//!     .build();
//! let report = profiler.analyze(&table)?;
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Properties
//!
//! - **Fixed pipeline**: twelve independent passes, always in the same
//!   order; a degraded condition in one never aborts the others.
//! - **Deterministic reports**: sorted maps and stable orderings make two
//!   runs over the same table serialize identically (charts aside).
//! - **Capability-aware**: optional computations (z-score outliers,
//!   normality testing, chart generation) degrade gracefully when their
//!   [`Capabilities`](capabilities::Capabilities) flag is off.
//! - **Pluggable charts**: artifacts go through the
//!   [`ChartRenderer`](charts::ChartRenderer) seam; the built-in backend
//!   writes Vega-Lite JSON specifications.

pub mod analysis;
pub mod capabilities;
pub mod charts;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod profiler;
pub mod report;
pub mod stats;
pub mod table;

pub use capabilities::Capabilities;
pub use error::{ChartError, ProfilerError, ProfilerResult};
pub use profiler::{Profiler, ProfilerBuilder};
pub use report::Report;
pub use table::{SemanticType, Table};

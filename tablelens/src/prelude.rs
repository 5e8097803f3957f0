//! Prelude for commonly used types in tablelens.

pub use crate::capabilities::Capabilities;
pub use crate::charts::{ChartKind, ChartRenderer, VegaLiteRenderer};
pub use crate::error::{ChartError, ProfilerError, ProfilerResult};
pub use crate::logging::LoggingConfig;
pub use crate::profiler::{Profiler, ProfilerBuilder};
pub use crate::report::Report;
pub use crate::table::{SemanticType, Table};

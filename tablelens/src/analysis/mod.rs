//! The fixed battery of analysis passes.
//!
//! Each pass is an independent, read-only computation over the table; no
//! pass observes another's intermediate state. The column-type partition
//! is computed once by the profiler and shared, purely as an
//! optimization. Passes absorb their own degraded conditions (missing
//! capability, too-small samples, unparseable columns) and only surface
//! structural failures.

pub mod basic;
pub mod categorical;
pub mod correlation;
pub mod narrative;
pub mod numeric;
pub mod temporal;

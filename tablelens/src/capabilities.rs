//! Optional-capability flags for the profiling pipeline.
//!
//! Every computation that depends on an optional facility (interactive
//! chart rendering, advanced statistical tests, static charts, clustering)
//! checks an explicit flag and falls back to its documented degraded
//! output when the flag is off. The flags are resolved once per process
//! and passed into the profiler as configuration, never consulted as
//! ambient global state.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DETECTED: Lazy<Capabilities> = Lazy::new(Capabilities::all);

/// Availability flags for optional profiling facilities.
///
/// `static_charts` and `clustering` are declared for completeness but the
/// fixed pass battery never invokes them; they exist so embedders can
/// report a consistent capability surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Interactive chart artifacts can be rendered to files.
    pub interactive_charts: bool,
    /// Normality tests and z-score outlier detection are available.
    pub advanced_stats: bool,
    /// Static (raster) chart rendering is available.
    pub static_charts: bool,
    /// Clustering and feature scaling are available.
    pub clustering: bool,
}

impl Capabilities {
    /// All capabilities available.
    pub fn all() -> Self {
        Self {
            interactive_charts: true,
            advanced_stats: true,
            static_charts: true,
            clustering: true,
        }
    }

    /// No optional capabilities; every gated computation degrades.
    pub fn none() -> Self {
        Self {
            interactive_charts: false,
            advanced_stats: false,
            static_charts: false,
            clustering: false,
        }
    }

    /// Returns the capability set detected for this process.
    ///
    /// Detection runs once and is cached for the process lifetime. All
    /// facilities ship with the crate, so detection currently reports
    /// everything available; embedders that cannot write chart artifacts
    /// or want to skip the statistical tests disable flags through the
    /// `with_*` methods instead.
    pub fn detect() -> Self {
        *DETECTED
    }

    /// Sets availability of interactive chart rendering.
    pub fn with_interactive_charts(mut self, available: bool) -> Self {
        self.interactive_charts = available;
        self
    }

    /// Sets availability of advanced statistical tests.
    pub fn with_advanced_stats(mut self, available: bool) -> Self {
        self.advanced_stats = available;
        self
    }

    /// Sets availability of static chart rendering.
    pub fn with_static_charts(mut self, available: bool) -> Self {
        self.static_charts = available;
        self
    }

    /// Sets availability of clustering and scaling.
    pub fn with_clustering(mut self, available: bool) -> Self {
        self.clustering = available;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

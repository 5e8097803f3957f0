//! The profiling pipeline.
//!
//! [`Profiler::analyze`] runs a fixed sequence of passes over a table and
//! assembles the aggregate [`Report`]. Passes are independent; a degraded
//! condition inside one (missing capability, unparseable column, failed
//! chart) never aborts the others. The only structural failure at the
//! pipeline level is a table with no columns.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::analysis::{basic, categorical, correlation, narrative, numeric, temporal};
use crate::capabilities::Capabilities;
use crate::charts::{self, ChartKind, ChartRenderer, VegaLiteRenderer};
use crate::error::{ChartError, ProfilerError, ProfilerResult};
use crate::report::{ChartFailure, ChartSection, Report};
use crate::table::{Table, TypePartition};

/// Default directory for chart artifacts, relative to the working
/// directory.
const DEFAULT_OUTPUT_DIR: &str = "charts";

/// Rows included in the report's data sample.
const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Runs the analysis pipeline and writes chart artifacts.
///
/// # Example
///
/// ```no_run
/// use tablelens::prelude::*;
/// # fn build_batch() -> arrow::record_batch::RecordBatch { unimplemented!() }
///
/// # fn main() -> Result<(), ProfilerError> {
/// let table = Table::new("sales", build_batch());
/// let mut profiler = Profiler::builder()
///     .output_dir("out/charts")
///     .build();
/// let report = profiler.analyze(&table)?;
/// println!("{}", serde_json::to_string_pretty(&report)?);
/// # Ok(())
/// # }
/// ```
pub struct Profiler {
    output_dir: PathBuf,
    capabilities: Capabilities,
    sample_limit: usize,
    renderer: Box<dyn ChartRenderer>,
    charts_generated: u64,
}

impl Profiler {
    /// Profiler with default configuration: detected capabilities, the
    /// default output directory and the built-in Vega-Lite renderer.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ProfilerBuilder {
        ProfilerBuilder::default()
    }

    /// Where chart artifacts are written.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Capability flags this profiler runs with.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Charts written across all runs of this instance.
    pub fn charts_generated(&self) -> u64 {
        self.charts_generated
    }

    /// Runs every pass over the table and assembles the report.
    ///
    /// A table with zero columns is the one structural failure; zero rows
    /// is fine and degrades each pass to placeholders.
    #[instrument(skip(self, table), fields(table = table.name(), rows = table.row_count()))]
    pub fn analyze(&mut self, table: &Table) -> ProfilerResult<Report> {
        if table.column_count() == 0 {
            return Err(ProfilerError::EmptyTable);
        }

        info!("starting analysis");
        let partition = table.type_partition();

        let basic_info = basic::basic_info(table, self.sample_limit)?;
        let descriptive_stats = numeric::descriptive_stats(table, &partition)?;
        let missing_values = basic::missing_values(table)?;
        let data_types = basic::data_types(&partition);
        let correlations = correlation::correlations(table, &partition)?;
        let outliers = numeric::outliers(table, &partition, &self.capabilities)?;
        let distributions = numeric::distributions(table, &partition, &self.capabilities)?;
        let categorical_analysis = categorical::categorical_analysis(table, &partition)?;
        let time_analysis = temporal::time_analysis(table, &partition)?;

        let charts = self.generate_charts(
            table,
            &partition,
            &correlations,
            &missing_values,
            &categorical_analysis,
        )?;

        let insights = narrative::insights(table, &partition, &missing_values)?;
        let recommendations = narrative::recommendations(
            table,
            &partition,
            &missing_values,
            &outliers,
            &correlations,
        )?;

        info!(
            charts = charts.generated.len(),
            insights = insights.len(),
            "analysis complete"
        );

        Ok(Report {
            basic_info,
            descriptive_stats,
            missing_values,
            data_types,
            correlations,
            outliers,
            distributions,
            categorical_analysis,
            time_analysis,
            charts,
            insights,
            recommendations,
        })
    }

    /// Attempts every applicable chart. Each failure is recorded and the
    /// remaining charts still run.
    fn generate_charts(
        &mut self,
        table: &Table,
        partition: &TypePartition,
        correlations: &crate::report::Correlations,
        missing: &crate::report::MissingValues,
        categorical: &std::collections::BTreeMap<String, crate::report::CategoricalSummary>,
    ) -> ProfilerResult<ChartSection> {
        let mut section = ChartSection::default();
        if !self.capabilities.interactive_charts {
            return Ok(section);
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let specs: Vec<(ChartKind, Result<Option<serde_json::Value>, ChartError>)> = vec![
            (
                ChartKind::CorrelationHeatmap,
                Ok(charts::correlation_heatmap(correlations)),
            ),
            (
                ChartKind::Distributions,
                charts::distribution_grid(table, partition),
            ),
            (
                ChartKind::BoxPlots,
                charts::box_plot_grid(table, partition),
            ),
            (
                ChartKind::MissingValues,
                Ok(charts::missing_values_chart(missing)),
            ),
            (
                ChartKind::CategoricalDistribution,
                Ok(charts::categorical_distribution_chart(partition, categorical)),
            ),
        ];

        for (kind, built) in specs {
            let spec = match built {
                Ok(Some(spec)) => spec,
                // Not applicable to this table; silently skipped.
                Ok(None) => continue,
                Err(err) => {
                    warn!(kind = %kind, error = %err, "chart build failed");
                    section.failures.push(ChartFailure {
                        kind,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match self.renderer.render(kind, &spec, &self.output_dir) {
                Ok(path) => {
                    self.charts_generated += 1;
                    section.generated.push(path.display().to_string());
                }
                Err(err) => {
                    warn!(kind = %kind, error = %err, "chart render failed");
                    section.failures.push(ChartFailure {
                        kind,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(section)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Profiler`].
pub struct ProfilerBuilder {
    output_dir: PathBuf,
    capabilities: Option<Capabilities>,
    sample_limit: usize,
    renderer: Option<Box<dyn ChartRenderer>>,
}

impl Default for ProfilerBuilder {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            capabilities: None,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            renderer: None,
        }
    }
}

impl ProfilerBuilder {
    /// Directory for chart artifacts, created before the first chart is
    /// written.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Overrides the detected capability flags.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// How many rows the report's data sample includes.
    pub fn sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    /// Swaps in a different chart backend.
    pub fn renderer(mut self, renderer: impl ChartRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn build(self) -> Profiler {
        Profiler {
            output_dir: self.output_dir,
            capabilities: self.capabilities.unwrap_or_default(),
            sample_limit: self.sample_limit,
            renderer: self.renderer.unwrap_or_else(|| Box::new(VegaLiteRenderer)),
            charts_generated: 0,
        }
    }
}

//! Chart artifact generation.
//!
//! Each chart kind has a builder that either produces a Vega-Lite
//! specification or declines (`None`) when the table lacks the columns the
//! chart needs. Declining is not a failure; only a built chart that cannot
//! be written counts as one. Rendering goes through the [`ChartRenderer`]
//! trait so a different backend can be plugged in; the built-in
//! [`VegaLiteRenderer`] writes the specification as JSON under the output
//! directory, one fixed filename per kind.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ChartError, ProfilerError};
use crate::report::{CategoricalSummary, CorrelationMatrix, Correlations, MissingValues};
use crate::table::{Table, TypePartition};

pub use crate::report::ChartKind;

/// Grid charts cover at most this many numeric columns.
const MAX_GRID_COLUMNS: usize = 6;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

impl From<ProfilerError> for ChartError {
    fn from(err: ProfilerError) -> Self {
        ChartError::Render(err.to_string())
    }
}

/// Backend seam for writing one chart artifact.
pub trait ChartRenderer {
    /// Writes the chart and returns the path of the artifact.
    fn render(&self, kind: ChartKind, spec: &Value, output_dir: &Path)
        -> Result<PathBuf, ChartError>;
}

/// Writes Vega-Lite specifications as JSON files.
#[derive(Debug, Default, Clone, Copy)]
pub struct VegaLiteRenderer;

impl ChartRenderer for VegaLiteRenderer {
    fn render(
        &self,
        kind: ChartKind,
        spec: &Value,
        output_dir: &Path,
    ) -> Result<PathBuf, ChartError> {
        let path = output_dir.join(kind.file_name());
        let rendered = serde_json::to_string_pretty(spec)?;
        std::fs::write(&path, rendered)?;
        debug!(kind = %kind, path = %path.display(), "wrote chart artifact");
        Ok(path)
    }
}

/// Heatmap of the correlation matrix. Declines without a computed matrix.
pub fn correlation_heatmap(correlations: &Correlations) -> Option<Value> {
    let Correlations::Computed { matrix, .. } = correlations else {
        return None;
    };
    Some(heatmap_spec(matrix))
}

fn heatmap_spec(matrix: &CorrelationMatrix) -> Value {
    let mut cells = Vec::new();
    for (i, row) in matrix.values.iter().enumerate() {
        for (j, r) in row.iter().enumerate() {
            cells.push(json!({
                "x": matrix.columns[i],
                "y": matrix.columns[j],
                "correlation": r,
            }));
        }
    }
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Correlation Matrix",
        "data": {"values": cells},
        "mark": "rect",
        "encoding": {
            "x": {"field": "x", "type": "nominal"},
            "y": {"field": "y", "type": "nominal"},
            "color": {
                "field": "correlation",
                "type": "quantitative",
                "scale": {"scheme": "redblue", "domain": [-1, 1]}
            }
        }
    })
}

/// Long-form records for the numeric grid charts, first columns only.
fn numeric_records(
    table: &Table,
    partition: &TypePartition,
) -> Result<Option<Vec<Value>>, ChartError> {
    if partition.numeric.is_empty() {
        return Ok(None);
    }
    let mut records = Vec::new();
    for name in partition.numeric.iter().take(MAX_GRID_COLUMNS) {
        for value in table.numeric_values(name)? {
            records.push(json!({"column": name, "value": value}));
        }
    }
    Ok(Some(records))
}

/// Histogram grid over the first numeric columns. Declines without any.
pub fn distribution_grid(
    table: &Table,
    partition: &TypePartition,
) -> Result<Option<Value>, ChartError> {
    let Some(records) = numeric_records(table, partition)? else {
        return Ok(None);
    };
    Ok(Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Distributions",
        "data": {"values": records},
        "mark": "bar",
        "encoding": {
            "x": {"field": "value", "type": "quantitative", "bin": {"maxbins": 30}},
            "y": {"aggregate": "count", "type": "quantitative"},
            "facet": {"field": "column", "type": "nominal", "columns": 3}
        }
    })))
}

/// Box-plot grid over the first numeric columns. Declines without any.
pub fn box_plot_grid(
    table: &Table,
    partition: &TypePartition,
) -> Result<Option<Value>, ChartError> {
    let Some(records) = numeric_records(table, partition)? else {
        return Ok(None);
    };
    Ok(Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Box Plots",
        "data": {"values": records},
        "mark": {"type": "boxplot", "extent": 1.5},
        "encoding": {
            "x": {"field": "column", "type": "nominal"},
            "y": {"field": "value", "type": "quantitative"}
        }
    })))
}

/// Bar chart of absent values per column. Declines when nothing is missing.
pub fn missing_values_chart(missing: &MissingValues) -> Option<Value> {
    if missing.total_missing == 0 {
        return None;
    }
    let records: Vec<Value> = missing
        .missing_count
        .iter()
        .map(|(column, count)| json!({"column": column, "missing": count}))
        .collect();
    Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Missing Values",
        "data": {"values": records},
        "mark": "bar",
        "encoding": {
            "x": {"field": "column", "type": "nominal"},
            "y": {"field": "missing", "type": "quantitative"}
        }
    }))
}

/// Top-ten bar chart for the first categorical column. Declines when the
/// table has none or the column is entirely absent.
pub fn categorical_distribution_chart(
    partition: &TypePartition,
    summaries: &std::collections::BTreeMap<String, CategoricalSummary>,
) -> Option<Value> {
    let column = partition.categorical.first()?;
    let summary = summaries.get(column)?;
    if summary.value_counts.is_empty() {
        return None;
    }
    let records: Vec<Value> = summary
        .value_counts
        .iter()
        .map(|vc| json!({"value": vc.value, "count": vc.count}))
        .collect();
    Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": format!("Top Values: {column}"),
        "data": {"values": records},
        "mark": "bar",
        "encoding": {
            "x": {"field": "value", "type": "nominal", "sort": "-y"},
            "y": {"field": "count", "type": "quantitative"}
        }
    }))
}

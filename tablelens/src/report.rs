//! Aggregate report produced by a profiling run.
//!
//! Every section is independently computed and serializable. Sections
//! that need preconditions (numeric columns for descriptive statistics,
//! at least two numeric columns for correlations) use a tagged enum whose
//! `unavailable` variant carries an explicit placeholder message, so "no
//! numeric columns" is always distinguishable from "empty results".
//!
//! Collections use `BTreeMap` or explicitly ordered vectors throughout,
//! which makes serialization deterministic: profiling the same table
//! twice yields byte-identical non-chart sections.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::table::SemanticType;

/// The aggregate result of one profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub basic_info: BasicInfo,
    pub descriptive_stats: DescriptiveStats,
    pub missing_values: MissingValues,
    pub data_types: DataTypeBreakdown,
    pub correlations: Correlations,
    pub outliers: BTreeMap<String, OutlierSummary>,
    pub distributions: BTreeMap<String, DistributionSummary>,
    pub categorical_analysis: BTreeMap<String, CategoricalSummary>,
    pub time_analysis: TimeAnalysis,
    pub charts: ChartSection,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Shape, size and a peek at the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub memory_estimate_bytes: usize,
    pub column_names: Vec<String>,
    pub column_types: BTreeMap<String, ColumnTypeInfo>,
    pub sample_rows: Vec<Map<String, Value>>,
}

/// Declared type of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTypeInfo {
    pub semantic: SemanticType,
    pub arrow: String,
}

/// Descriptive statistics over the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DescriptiveStats {
    /// The table has no numeric columns.
    Unavailable { message: String },
    Computed {
        columns: BTreeMap<String, NumericSummary>,
    },
}

/// Five-number summary plus shape statistics for one numeric column.
///
/// Optional fields are `None` whenever the sample is too small for the
/// statistic (skewness needs three values, kurtosis four, variance two).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Count of non-null values.
    pub count: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub variance: Option<f64>,
}

/// Missing-value profile of the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValues {
    pub missing_count: BTreeMap<String, u64>,
    pub missing_percent: BTreeMap<String, f64>,
    pub total_missing: u64,
    /// Columns with at least one absent value, in table order.
    pub columns_with_missing: Vec<String>,
}

/// Column membership by semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTypeBreakdown {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub temporal_columns: Vec<String>,
    pub numeric_count: usize,
    pub categorical_count: usize,
    pub temporal_count: usize,
}

/// Pairwise correlation structure of the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlations {
    /// Fewer than two numeric columns.
    Unavailable { message: String },
    Computed {
        matrix: CorrelationMatrix,
        /// Pairs with |r| > 0.1, strongest first, at most ten.
        strong_correlations: Vec<CorrelationPair>,
        highest_correlation: Option<CorrelationPair>,
    },
}

/// Dense correlation matrix; `values[i][j]` correlates `columns[i]` with
/// `columns[j]`. Undefined entries (zero-variance columns) are NaN and
/// serialize as JSON null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// One unordered column pair and its correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub column_a: String,
    pub column_b: String,
    pub correlation: f64,
    pub strength: CorrelationStrength,
}

/// Strength bucket for an absolute correlation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl CorrelationStrength {
    /// Buckets an absolute correlation value.
    pub fn from_abs(abs_correlation: f64) -> Self {
        if abs_correlation >= 0.7 {
            Self::VeryStrong
        } else if abs_correlation >= 0.5 {
            Self::Strong
        } else if abs_correlation >= 0.3 {
            Self::Moderate
        } else if abs_correlation >= 0.1 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }
}

impl std::fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::VeryStrong => "Very Strong",
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
            Self::VeryWeak => "Very Weak",
        };
        write!(f, "{label}")
    }
}

/// Outlier profile of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Values strictly outside `[lower_bound, upper_bound]`.
    pub iqr_outlier_count: u64,
    /// Percentage over the total row count, nulls included.
    pub iqr_outlier_percent: f64,
    /// Q1 - 1.5 * IQR.
    pub lower_bound: f64,
    /// Q3 + 1.5 * IQR.
    pub upper_bound: f64,
    /// Values with |z| > 3; zero when advanced stats are unavailable.
    pub z_outlier_count: u64,
    pub z_outlier_percent: f64,
}

/// Distribution profile of one numeric column, absent values excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Smallest among the most frequent values; `None` when the column
    /// has no present values.
    pub mode: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub unique_count: u64,
    pub unique_percent: f64,
    /// `Some(p > 0.05)` when the normality test ran, `None` when advanced
    /// stats are unavailable or the sample is too small.
    pub is_normal: Option<bool>,
    pub normality_p_value: Option<f64>,
}

/// Frequency profile of one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub unique_count: u64,
    pub most_frequent: Option<String>,
    pub most_frequent_count: u64,
    pub least_frequent: Option<String>,
    pub least_frequent_count: u64,
    /// Top ten values by frequency, count descending then value ascending.
    pub value_counts: Vec<ValueCount>,
    pub missing_count: u64,
}

/// One value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Time-pattern profile across all time-like columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimeAnalysis {
    pub columns: BTreeMap<String, TimeColumnSummary>,
    /// Candidate columns where not a single value parsed as a timestamp.
    pub skipped_columns: Vec<String>,
}

/// Observed time range of one parseable time-like column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeColumnSummary {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
    pub span_days: i64,
    /// Absent plus unparseable values.
    pub missing_count: u64,
}

/// Chart artifacts written during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartSection {
    /// Paths of successfully written charts, in generation order.
    pub generated: Vec<String>,
    /// Charts that were applicable but failed to render.
    pub failures: Vec<ChartFailure>,
}

/// A chart that was attempted and failed; siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFailure {
    pub kind: ChartKind,
    pub reason: String,
}

/// The fixed chart kinds the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    CorrelationHeatmap,
    Distributions,
    BoxPlots,
    MissingValues,
    CategoricalDistribution,
}

impl ChartKind {
    /// Fixed artifact filename for this chart kind; reruns overwrite it.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::CorrelationHeatmap => "correlation_heatmap.vl.json",
            Self::Distributions => "distributions.vl.json",
            Self::BoxPlots => "boxplots.vl.json",
            Self::MissingValues => "missing_values.vl.json",
            Self::CategoricalDistribution => "categorical_distribution.vl.json",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CorrelationHeatmap => "correlation_heatmap",
            Self::Distributions => "distributions",
            Self::BoxPlots => "boxplots",
            Self::MissingValues => "missing_values",
            Self::CategoricalDistribution => "categorical_distribution",
        };
        write!(f, "{name}")
    }
}

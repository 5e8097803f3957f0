//! Numeric-column passes: descriptive statistics, outlier detection and
//! distribution analysis.

use std::collections::BTreeMap;

use tracing::debug;

use crate::capabilities::Capabilities;
use crate::error::ProfilerResult;
use crate::report::{DescriptiveStats, DistributionSummary, NumericSummary, OutlierSummary};
use crate::stats;
use crate::table::{Table, TypePartition};

/// Z-score threshold beyond which a value counts as an outlier.
const Z_SCORE_THRESHOLD: f64 = 3.0;

/// Five-number summaries plus shape statistics for every numeric column.
pub fn descriptive_stats(
    table: &Table,
    partition: &TypePartition,
) -> ProfilerResult<DescriptiveStats> {
    if partition.numeric.is_empty() {
        return Ok(DescriptiveStats::Unavailable {
            message: "No numeric columns found".to_string(),
        });
    }

    let mut columns = BTreeMap::new();
    for name in &partition.numeric {
        let mut values = table.numeric_values(name)?;
        values.sort_by(f64::total_cmp);
        columns.insert(
            name.clone(),
            NumericSummary {
                count: values.len() as u64,
                mean: stats::mean(&values),
                std: stats::std_dev(&values),
                min: values.first().copied(),
                q1: stats::quantile_sorted(&values, 0.25),
                median: stats::quantile_sorted(&values, 0.5),
                q3: stats::quantile_sorted(&values, 0.75),
                max: values.last().copied(),
                skewness: stats::skewness(&values),
                kurtosis: stats::kurtosis(&values),
                variance: stats::variance(&values),
            },
        );
    }

    Ok(DescriptiveStats::Computed { columns })
}

/// IQR bounds for a sorted sample: `(Q1 - 1.5*IQR, Q3 + 1.5*IQR)`.
pub fn iqr_bounds(sorted: &[f64]) -> Option<(f64, f64)> {
    let q1 = stats::quantile_sorted(sorted, 0.25)?;
    let q3 = stats::quantile_sorted(sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}

/// IQR and (capability-gated) z-score outlier profiles per numeric column.
///
/// Columns without a single present value have no defined quartiles and
/// are omitted; siblings are unaffected. Percentages are taken over the
/// total row count, nulls included.
pub fn outliers(
    table: &Table,
    partition: &TypePartition,
    capabilities: &Capabilities,
) -> ProfilerResult<BTreeMap<String, OutlierSummary>> {
    let rows = table.row_count();
    let percent_of_rows = |count: u64| {
        if rows == 0 {
            0.0
        } else {
            count as f64 / rows as f64 * 100.0
        }
    };

    let mut summaries = BTreeMap::new();
    for name in &partition.numeric {
        let mut values = table.numeric_values(name)?;
        values.sort_by(f64::total_cmp);
        let Some((lower_bound, upper_bound)) = iqr_bounds(&values) else {
            debug!(column = %name, "no present values, skipping outlier profile");
            continue;
        };

        let iqr_outlier_count = values
            .iter()
            .filter(|v| **v < lower_bound || **v > upper_bound)
            .count() as u64;

        // The z-score method needs the advanced-statistics capability;
        // without it the counts degrade to zero rather than erroring.
        let z_outlier_count = if capabilities.advanced_stats {
            stats::z_score_outlier_count(&values, Z_SCORE_THRESHOLD)
        } else {
            0
        };

        summaries.insert(
            name.clone(),
            OutlierSummary {
                iqr_outlier_count,
                iqr_outlier_percent: percent_of_rows(iqr_outlier_count),
                lower_bound,
                upper_bound,
                z_outlier_count,
                z_outlier_percent: percent_of_rows(z_outlier_count),
            },
        );
    }
    Ok(summaries)
}

/// Distribution profile per numeric column, absent values excluded.
pub fn distributions(
    table: &Table,
    partition: &TypePartition,
    capabilities: &Capabilities,
) -> ProfilerResult<BTreeMap<String, DistributionSummary>> {
    let mut summaries = BTreeMap::new();
    for name in &partition.numeric {
        let mut values = table.numeric_values(name)?;
        values.sort_by(f64::total_cmp);

        let unique_count = stats::distinct_count(&values);
        let unique_percent = if values.is_empty() {
            0.0
        } else {
            unique_count as f64 / values.len() as f64 * 100.0
        };

        let (is_normal, normality_p_value) = if capabilities.advanced_stats {
            match stats::normality_test(&values) {
                Some((_, p_value)) => (Some(p_value > 0.05), Some(p_value)),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        let min = values.first().copied();
        let max = values.last().copied();
        summaries.insert(
            name.clone(),
            DistributionSummary {
                mean: stats::mean(&values),
                median: stats::quantile_sorted(&values, 0.5),
                mode: stats::mode(&values),
                std: stats::std_dev(&values),
                min,
                max,
                range: match (min, max) {
                    (Some(lo), Some(hi)) => Some(hi - lo),
                    _ => None,
                },
                skewness: stats::skewness(&values),
                kurtosis: stats::kurtosis(&values),
                unique_count,
                unique_percent,
                is_normal,
                normality_p_value,
            },
        );
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn numeric_table() -> Table {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Int64, true),
            Field::new("score", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![
                    Some(25),
                    Some(30),
                    None,
                    Some(40),
                    Some(200),
                ])),
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0, 5.0])),
            ],
        )
        .unwrap();
        Table::new("t", batch)
    }

    fn text_only_table() -> Table {
        let schema = Arc::new(Schema::new(vec![Field::new("s", DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec!["a", "b"])) as _],
        )
        .unwrap();
        Table::new("t", batch)
    }

    #[test]
    fn test_descriptive_placeholder_without_numeric_columns() {
        let table = text_only_table();
        let result = descriptive_stats(&table, &table.type_partition()).unwrap();
        match result {
            DescriptiveStats::Unavailable { message } => {
                assert_eq!(message, "No numeric columns found");
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_descriptive_stats_values() {
        let table = numeric_table();
        let result = descriptive_stats(&table, &table.type_partition()).unwrap();
        let DescriptiveStats::Computed { columns } = result else {
            panic!("expected computed stats");
        };
        let score = &columns["score"];
        assert_eq!(score.count, 5);
        assert_eq!(score.mean, Some(3.0));
        assert_eq!(score.median, Some(3.0));
        assert_eq!(score.min, Some(1.0));
        assert_eq!(score.max, Some(5.0));
        assert_eq!(score.q1, Some(2.0));
        assert_eq!(score.q3, Some(4.0));
        // Age has a missing value: stats run over the 4 present values.
        assert_eq!(columns["age"].count, 4);
        assert_eq!(columns["age"].mean, Some(73.75));
    }

    #[test]
    fn test_iqr_outlier_bounds_and_count() {
        let table = numeric_table();
        let caps = Capabilities::all();
        let result = outliers(&table, &table.type_partition(), &caps).unwrap();
        let age = &result["age"];
        // Present values [25, 30, 40, 200]: Q1 = 28.75, Q3 = 80.0.
        let iqr = 80.0 - 28.75;
        assert!((age.lower_bound - (28.75 - 1.5 * iqr)).abs() < 1e-9);
        assert!((age.upper_bound - (80.0 + 1.5 * iqr)).abs() < 1e-9);
        assert_eq!(age.iqr_outlier_count, 1, "200 is outside the IQR fence");
        assert_eq!(age.iqr_outlier_percent, 20.0, "percent over all 5 rows");
    }

    #[test]
    fn test_z_outliers_degrade_without_advanced_stats() {
        let table = numeric_table();
        let caps = Capabilities::all().with_advanced_stats(false);
        let result = outliers(&table, &table.type_partition(), &caps).unwrap();
        assert_eq!(result["age"].z_outlier_count, 0);
        assert_eq!(result["age"].z_outlier_percent, 0.0);
    }

    #[test]
    fn test_distribution_summary() {
        let table = numeric_table();
        let caps = Capabilities::all();
        let result = distributions(&table, &table.type_partition(), &caps).unwrap();
        let age = &result["age"];
        assert_eq!(age.mean, Some(73.75));
        assert_eq!(age.min, Some(25.0));
        assert_eq!(age.max, Some(200.0));
        assert_eq!(age.range, Some(175.0));
        assert_eq!(age.unique_count, 4);
        assert_eq!(age.unique_percent, 100.0);
        // Sample too small for the normality test.
        assert!(age.is_normal.is_none());
    }

    #[test]
    fn test_all_null_column_yields_empty_summary() {
        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![None::<i64>, None])) as _],
        )
        .unwrap();
        let table = Table::new("t", batch);
        let caps = Capabilities::all();

        // No quartiles, so no outlier entry at all.
        let outlier_result = outliers(&table, &table.type_partition(), &caps).unwrap();
        assert!(outlier_result.is_empty());

        // Distribution entry exists but every statistic is absent.
        let dist = distributions(&table, &table.type_partition(), &caps).unwrap();
        let n = &dist["n"];
        assert!(n.mean.is_none());
        assert!(n.mode.is_none());
        assert_eq!(n.unique_count, 0);
    }
}

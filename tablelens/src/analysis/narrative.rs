//! Human-readable insights and recommendations derived from the other
//! passes.

use std::collections::BTreeMap;

use crate::error::ProfilerResult;
use crate::report::{Correlations, MissingValues, OutlierSummary};
use crate::stats;
use crate::table::{Table, TypePartition};

/// List-style messages name at most this many columns.
const MAX_NAMED_COLUMNS: usize = 3;

/// Coefficient of variation above which a column counts as high-variability.
const HIGH_VARIABILITY_CV: f64 = 1.0;

/// IQR outliers beyond this fraction of rows earn a recommendation.
const OUTLIER_FRACTION: f64 = 0.05;

/// Absolute correlation above which dimensionality reduction is suggested.
const HIGH_CORRELATION: f64 = 0.8;

/// Minority/majority frequency ratio below which a binary column counts
/// as imbalanced.
const IMBALANCE_RATIO: f64 = 0.1;

/// Ordered free-text observations about the dataset.
pub fn insights(
    table: &Table,
    partition: &TypePartition,
    missing: &MissingValues,
) -> ProfilerResult<Vec<String>> {
    let mut out = Vec::new();

    let rows = table.row_count();
    let cols = table.column_count();
    out.push(format!(
        "Dataset contains {rows} records and {cols} variables"
    ));

    if missing.total_missing == 0 {
        out.push("No missing values detected".to_string());
    } else {
        let cells = (rows * cols) as f64;
        let percent = missing.total_missing as f64 / cells * 100.0;
        out.push(format!(
            "{} missing values ({percent:.1}% of all cells)",
            missing.total_missing
        ));
    }

    out.push(format!(
        "{} numeric and {} categorical variables",
        partition.numeric.len(),
        partition.categorical.len()
    ));

    let duplicates = table.duplicate_row_count()?;
    if duplicates > 0 {
        out.push(format!("{duplicates} duplicate records found"));
    } else {
        out.push("No duplicate records".to_string());
    }

    let mut high_variability = Vec::new();
    for name in &partition.numeric {
        let values = table.numeric_values(name)?;
        if let Some(cv) = stats::coefficient_of_variation(&values) {
            if cv > HIGH_VARIABILITY_CV {
                high_variability.push(name.clone());
            }
        }
        if high_variability.len() == MAX_NAMED_COLUMNS {
            break;
        }
    }
    if !high_variability.is_empty() {
        out.push(format!(
            "High-variability variables: {}",
            high_variability.join(", ")
        ));
    }

    Ok(out)
}

/// Ordered suggestions for follow-up data preparation.
pub fn recommendations(
    table: &Table,
    partition: &TypePartition,
    missing: &MissingValues,
    outliers: &BTreeMap<String, OutlierSummary>,
    correlations: &Correlations,
) -> ProfilerResult<Vec<String>> {
    let mut out = Vec::new();

    if !missing.columns_with_missing.is_empty() {
        let named: Vec<&str> = missing
            .columns_with_missing
            .iter()
            .take(MAX_NAMED_COLUMNS)
            .map(String::as_str)
            .collect();
        out.push(format!(
            "Consider treating missing values in: {}",
            named.join(", ")
        ));
    }

    let threshold = table.row_count() as f64 * OUTLIER_FRACTION;
    let heavy: Vec<&str> = partition
        .numeric
        .iter()
        .filter(|name| {
            outliers
                .get(*name)
                .is_some_and(|s| s.iqr_outlier_count as f64 > threshold)
        })
        .take(MAX_NAMED_COLUMNS)
        .map(String::as_str)
        .collect();
    if !heavy.is_empty() {
        out.push(format!("Investigate outliers in: {}", heavy.join(", ")));
    }

    // The full matrix is checked, not just the reported top pairs.
    if let Correlations::Computed { matrix, .. } = correlations {
        let any_high = matrix.values.iter().enumerate().any(|(i, row)| {
            row.iter()
                .enumerate()
                .any(|(j, r)| j > i && r.is_finite() && r.abs() > HIGH_CORRELATION)
        });
        if any_high {
            out.push(
                "Highly correlated variables detected - consider dimensionality reduction"
                    .to_string(),
            );
        }
    }

    for name in &partition.numeric {
        let values = table.numeric_values(name)?;
        if stats::distinct_count(&values) != 2 {
            continue;
        }
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        for v in &values {
            *counts.entry(v.to_bits()).or_insert(0) += 1;
        }
        let min = counts.values().min().copied().unwrap_or(0);
        let max = counts.values().max().copied().unwrap_or(0);
        if max > 0 && (min as f64 / max as f64) < IMBALANCE_RATIO {
            out.push(format!(
                "Variable '{name}' is imbalanced - consider resampling techniques"
            ));
            // One resampling suggestion is enough.
            break;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{basic, correlation, numeric};
    use crate::capabilities::Capabilities;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn build_table(
        numeric: Vec<(&str, Vec<Option<f64>>)>,
        strings: Vec<(&str, Vec<Option<&str>>)>,
    ) -> Table {
        let mut fields = Vec::new();
        let mut arrays: Vec<arrow::array::ArrayRef> = Vec::new();
        for (name, values) in numeric {
            fields.push(Field::new(name, DataType::Float64, true));
            arrays.push(Arc::new(Float64Array::from(values)));
        }
        for (name, values) in strings {
            fields.push(Field::new(name, DataType::Utf8, true));
            arrays.push(Arc::new(StringArray::from(values)));
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
        Table::new("t", batch)
    }

    #[test]
    fn test_insights_clean_dataset() {
        let table = build_table(
            vec![("a", vec![Some(1.0), Some(2.0), Some(3.0)])],
            vec![("b", vec![Some("x"), Some("y"), Some("z")])],
        );
        let partition = table.type_partition();
        let missing = basic::missing_values(&table).unwrap();
        let result = insights(&table, &partition, &missing).unwrap();
        assert_eq!(result[0], "Dataset contains 3 records and 2 variables");
        assert_eq!(result[1], "No missing values detected");
        assert_eq!(result[2], "1 numeric and 1 categorical variables");
        assert_eq!(result[3], "No duplicate records");
        assert_eq!(result.len(), 4, "no high-variability message");
    }

    #[test]
    fn test_insights_missing_and_variability() {
        // CV of the spread column is well above 1.
        let table = build_table(
            vec![("spread", vec![Some(1.0), Some(1.0), Some(1.0), Some(1000.0), None])],
            vec![],
        );
        let partition = table.type_partition();
        let missing = basic::missing_values(&table).unwrap();
        let result = insights(&table, &partition, &missing).unwrap();
        assert_eq!(result[1], "1 missing values (20.0% of all cells)");
        assert!(result.contains(&"High-variability variables: spread".to_string()));
    }

    #[test]
    fn test_insights_duplicates() {
        let table = build_table(
            vec![("a", vec![Some(1.0), Some(1.0), Some(2.0)])],
            vec![("b", vec![Some("x"), Some("x"), Some("y")])],
        );
        let partition = table.type_partition();
        let missing = basic::missing_values(&table).unwrap();
        let result = insights(&table, &partition, &missing).unwrap();
        assert!(result.contains(&"1 duplicate records found".to_string()));
    }

    #[test]
    fn test_recommendations_missing_outliers_and_correlation() {
        let xs: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64)).collect();
        let mut ys: Vec<Option<f64>> = (0..20).map(|i| Some(2.0 * i as f64)).collect();
        ys[0] = None;
        // A column whose tail value is a heavy outlier.
        let mut spikes: Vec<Option<f64>> = (0..20).map(|_| Some(5.0)).collect();
        spikes[10] = Some(4.9);
        spikes[19] = Some(10_000.0);
        let table = build_table(vec![("x", xs), ("y", ys), ("spike", spikes)], vec![]);
        let partition = table.type_partition();
        let missing = basic::missing_values(&table).unwrap();
        let caps = Capabilities::all();
        let outlier_map = numeric::outliers(&table, &partition, &caps).unwrap();
        let corr = correlation::correlations(&table, &partition).unwrap();

        let result = recommendations(&table, &partition, &missing, &outlier_map, &corr).unwrap();
        assert_eq!(result[0], "Consider treating missing values in: y");
        assert!(result.contains(&"Investigate outliers in: spike".to_string()));
        assert!(result.contains(
            &"Highly correlated variables detected - consider dimensionality reduction"
                .to_string()
        ));
    }

    #[test]
    fn test_imbalanced_binary_column() {
        // 1 positive against 19 negatives: ratio 1/19 < 0.1.
        let mut flags: Vec<Option<f64>> = (0..19).map(|_| Some(0.0)).collect();
        flags.push(Some(1.0));
        let table = build_table(vec![("flag", flags)], vec![]);
        let partition = table.type_partition();
        let missing = basic::missing_values(&table).unwrap();
        let corr = correlation::correlations(&table, &partition).unwrap();
        let result =
            recommendations(&table, &partition, &missing, &BTreeMap::new(), &corr).unwrap();
        assert_eq!(
            result,
            vec!["Variable 'flag' is imbalanced - consider resampling techniques"]
        );
    }

    #[test]
    fn test_balanced_binary_column_passes() {
        let flags: Vec<Option<f64>> = (0..20).map(|i| Some((i % 2) as f64)).collect();
        let table = build_table(vec![("flag", flags)], vec![]);
        let partition = table.type_partition();
        let missing = basic::missing_values(&table).unwrap();
        let corr = correlation::correlations(&table, &partition).unwrap();
        let result =
            recommendations(&table, &partition, &missing, &BTreeMap::new(), &corr).unwrap();
        assert!(result.is_empty());
    }
}

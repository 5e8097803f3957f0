//! Pairwise Pearson correlations over the numeric columns.

use tracing::debug;

use crate::error::ProfilerResult;
use crate::report::{CorrelationMatrix, CorrelationPair, CorrelationStrength, Correlations};
use crate::stats;
use crate::table::{Table, TypePartition};

/// Pairs with an absolute correlation above this are reported.
const SIGNIFICANCE_THRESHOLD: f64 = 0.1;

/// At most this many pairs make the report, strongest first.
const MAX_REPORTED_PAIRS: usize = 10;

/// Dense correlation matrix plus the notable pairs.
///
/// Each pair is correlated over its pairwise-complete observations: rows
/// where both columns are present. The diagonal is fixed at 1.0; a pair
/// with fewer than two complete rows or a zero-variance side gets NaN.
pub fn correlations(table: &Table, partition: &TypePartition) -> ProfilerResult<Correlations> {
    let columns = &partition.numeric;
    if columns.len() < 2 {
        return Ok(Correlations::Unavailable {
            message: "Fewer than 2 numeric columns found".to_string(),
        });
    }

    let mut series = Vec::with_capacity(columns.len());
    for name in columns {
        series.push(table.numeric_values_with_nulls(name)?);
    }

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let pairs: Vec<(f64, f64)> = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .collect();
            let r = stats::pearson(&pairs).unwrap_or(f64::NAN);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    let mut strong_correlations = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let r = values[i][j];
            if r.is_finite() && r.abs() > SIGNIFICANCE_THRESHOLD {
                strong_correlations.push(CorrelationPair {
                    column_a: columns[i].clone(),
                    column_b: columns[j].clone(),
                    correlation: r,
                    strength: CorrelationStrength::from_abs(r.abs()),
                });
            }
        }
    }
    strong_correlations
        .sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
    strong_correlations.truncate(MAX_REPORTED_PAIRS);

    debug!(
        columns = n,
        notable_pairs = strong_correlations.len(),
        "computed correlation matrix"
    );

    let highest_correlation = strong_correlations.first().cloned();
    Ok(Correlations::Computed {
        matrix: CorrelationMatrix {
            columns: columns.clone(),
            values,
        },
        strong_correlations,
        highest_correlation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Float64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn table_of(columns: Vec<(&str, Vec<Option<f64>>)>) -> Table {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, true))
            .collect();
        let arrays = columns
            .into_iter()
            .map(|(_, values)| Arc::new(Float64Array::from(values)) as _)
            .collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
        Table::new("t", batch)
    }

    #[test]
    fn test_unavailable_with_one_numeric_column() {
        let table = table_of(vec![("x", vec![Some(1.0), Some(2.0)])]);
        let result = correlations(&table, &table.type_partition()).unwrap();
        match result {
            Correlations::Unavailable { message } => {
                assert_eq!(message, "Fewer than 2 numeric columns found");
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_perfect_linear_pair() {
        let xs: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64)).collect();
        let ys: Vec<Option<f64>> = (0..20).map(|i| Some(3.0 * i as f64 - 5.0)).collect();
        let table = table_of(vec![("x", xs), ("y", ys)]);
        let result = correlations(&table, &table.type_partition()).unwrap();
        let Correlations::Computed {
            matrix,
            strong_correlations,
            highest_correlation,
        } = result
        else {
            panic!("expected computed correlations");
        };
        assert_eq!(matrix.columns, vec!["x", "y"]);
        assert_eq!(matrix.values[0][0], 1.0);
        assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(matrix.values[0][1], matrix.values[1][0]);

        assert_eq!(strong_correlations.len(), 1);
        let top = highest_correlation.unwrap();
        assert_eq!(top.strength, CorrelationStrength::VeryStrong);
        assert!((top.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_rows_only() {
        // Row 2 is missing on one side and must be dropped for this pair.
        let table = table_of(vec![
            ("x", vec![Some(1.0), Some(2.0), None, Some(4.0)]),
            ("y", vec![Some(2.0), Some(4.0), Some(99.0), Some(8.0)]),
        ]);
        let result = correlations(&table, &table.type_partition()).unwrap();
        let Correlations::Computed { matrix, .. } = result else {
            panic!("expected computed correlations");
        };
        assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_yields_nan_entry() {
        let table = table_of(vec![
            ("x", vec![Some(1.0), Some(2.0), Some(3.0)]),
            ("c", vec![Some(7.0), Some(7.0), Some(7.0)]),
        ]);
        let result = correlations(&table, &table.type_partition()).unwrap();
        let Correlations::Computed {
            matrix,
            strong_correlations,
            ..
        } = result
        else {
            panic!("expected computed correlations");
        };
        assert!(matrix.values[0][1].is_nan());
        assert!(strong_correlations.is_empty(), "NaN pairs are never notable");
    }

    #[test]
    fn test_weak_pairs_are_filtered() {
        // Alternating series has near-zero correlation with a ramp.
        let xs: Vec<Option<f64>> = (0..40).map(|i| Some(i as f64)).collect();
        let ys: Vec<Option<f64>> = (0..40)
            .map(|i| Some(if i % 2 == 0 { 1.0 } else { -1.0 }))
            .collect();
        let table = table_of(vec![("ramp", xs), ("alt", ys)]);
        let result = correlations(&table, &table.type_partition()).unwrap();
        let Correlations::Computed {
            strong_correlations,
            highest_correlation,
            ..
        } = result
        else {
            panic!("expected computed correlations");
        };
        assert!(strong_correlations.is_empty());
        assert!(highest_correlation.is_none());
    }
}

//! Table abstraction over an Arrow record batch.
//!
//! The profiler does not load data itself; an external loader (CSV reader,
//! Parquet reader, query result) hands it a fully materialized
//! [`RecordBatch`]. `Table` wraps that batch with semantic-type
//! classification and the typed accessors the analysis passes need.
//! Analysis is strictly read-only: nothing here mutates the batch.

use std::collections::HashSet;

use arrow::array::{Array, ArrayRef, Date32Array, Date64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{ProfilerError, ProfilerResult};

/// Semantic type of a column, derived from its Arrow data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Integer, unsigned, floating point or decimal values.
    Numeric,
    /// Text and everything else that is not numeric or temporal.
    Categorical,
    /// Dates and timestamps.
    Temporal,
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Numeric => write!(f, "numeric"),
            SemanticType::Categorical => write!(f, "categorical"),
            SemanticType::Temporal => write!(f, "temporal"),
        }
    }
}

/// Column names partitioned by semantic type, in table order.
///
/// Computed once per analysis run and shared across passes.
#[derive(Debug, Clone, Default)]
pub struct TypePartition {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub temporal: Vec<String>,
}

/// A named, immutable table backed by a single Arrow record batch.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    batch: RecordBatch,
}

impl Table {
    /// Wraps a record batch under the given table name.
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the underlying record batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Approximate in-memory size of the table's buffers, in bytes.
    pub fn memory_estimate(&self) -> usize {
        self.batch.get_array_memory_size()
    }

    /// Classifies an Arrow data type into its semantic type.
    pub fn classify(data_type: &DataType) -> SemanticType {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => SemanticType::Numeric,
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                SemanticType::Temporal
            }
            _ => SemanticType::Categorical,
        }
    }

    /// Semantic type of a named column.
    pub fn semantic_type(&self, column: &str) -> ProfilerResult<SemanticType> {
        let field = self
            .batch
            .schema()
            .field_with_name(column)
            .map_err(|_| ProfilerError::ColumnNotFound(column.to_string()))?
            .clone();
        Ok(Self::classify(field.data_type()))
    }

    /// Arrow data type of a named column.
    pub fn data_type(&self, column: &str) -> ProfilerResult<DataType> {
        let schema = self.batch.schema();
        let field = schema
            .field_with_name(column)
            .map_err(|_| ProfilerError::ColumnNotFound(column.to_string()))?;
        Ok(field.data_type().clone())
    }

    /// Partitions the columns by semantic type, preserving table order.
    pub fn type_partition(&self) -> TypePartition {
        let mut partition = TypePartition::default();
        for field in self.batch.schema().fields() {
            match Self::classify(field.data_type()) {
                SemanticType::Numeric => partition.numeric.push(field.name().clone()),
                SemanticType::Categorical => partition.categorical.push(field.name().clone()),
                SemanticType::Temporal => partition.temporal.push(field.name().clone()),
            }
        }
        partition
    }

    /// Returns the array backing a named column.
    pub fn column(&self, column: &str) -> ProfilerResult<&ArrayRef> {
        self.batch
            .column_by_name(column)
            .ok_or_else(|| ProfilerError::ColumnNotFound(column.to_string()))
    }

    /// Count of absent (null) values in a column.
    pub fn null_count(&self, column: &str) -> ProfilerResult<usize> {
        Ok(self.column(column)?.null_count())
    }

    /// Values of a numeric column as `f64`, row-aligned, nulls as `None`.
    ///
    /// Floating-point NaN values are reported as absent as well; the
    /// analysis passes treat them identically to nulls so every
    /// downstream statistic is defined over finite values only.
    pub fn numeric_values_with_nulls(&self, column: &str) -> ProfilerResult<Vec<Option<f64>>> {
        let array = self.column(column)?;
        if Self::classify(array.data_type()) != SemanticType::Numeric {
            return Err(ProfilerError::type_mismatch(
                column,
                format!("expected a numeric column, found {}", array.data_type()),
            ));
        }
        let doubles = cast(array, &DataType::Float64)?;
        let doubles = doubles
            .as_any()
            .downcast_ref::<arrow::array::Float64Array>()
            .ok_or_else(|| {
                ProfilerError::type_mismatch(column, "cast to Float64 produced unexpected array")
            })?;
        Ok((0..doubles.len())
            .map(|i| {
                if doubles.is_null(i) {
                    None
                } else {
                    let v = doubles.value(i);
                    if v.is_nan() {
                        None
                    } else {
                        Some(v)
                    }
                }
            })
            .collect())
    }

    /// Non-null, finite values of a numeric column, in row order.
    pub fn numeric_values(&self, column: &str) -> ProfilerResult<Vec<f64>> {
        Ok(self
            .numeric_values_with_nulls(column)?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Display values of any column, row-aligned, nulls as `None`.
    pub fn string_values(&self, column: &str) -> ProfilerResult<Vec<Option<String>>> {
        let array = self.column(column)?;
        let mut values = Vec::with_capacity(array.len());
        for i in 0..array.len() {
            if array.is_null(i) {
                values.push(None);
            } else {
                values.push(Some(array_value_to_string(array, i)?));
            }
        }
        Ok(values)
    }

    /// Values of a declared temporal column, row-aligned, nulls as `None`.
    pub fn temporal_values(&self, column: &str) -> ProfilerResult<Vec<Option<NaiveDateTime>>> {
        let array = self.column(column)?;
        let len = array.len();
        let at = |secs: i64, nanos: u32| -> Option<NaiveDateTime> {
            DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
        };
        let values: Vec<Option<NaiveDateTime>> = match array.data_type() {
            DataType::Date32 => {
                let arr = array
                    .as_any()
                    .downcast_ref::<Date32Array>()
                    .ok_or_else(|| ProfilerError::type_mismatch(column, "expected Date32Array"))?;
                (0..len)
                    .map(|i| {
                        if arr.is_null(i) {
                            None
                        } else {
                            at(i64::from(arr.value(i)) * 86_400, 0)
                        }
                    })
                    .collect()
            }
            DataType::Date64 => {
                let arr = array
                    .as_any()
                    .downcast_ref::<Date64Array>()
                    .ok_or_else(|| ProfilerError::type_mismatch(column, "expected Date64Array"))?;
                (0..len)
                    .map(|i| {
                        if arr.is_null(i) {
                            None
                        } else {
                            let ms = arr.value(i);
                            at(ms.div_euclid(1000), (ms.rem_euclid(1000) * 1_000_000) as u32)
                        }
                    })
                    .collect()
            }
            DataType::Timestamp(unit, _) => {
                // Normalize every unit to (seconds, nanos) before building
                // the chrono value; the timezone is ignored on purpose.
                let nanos_per: i64 = match unit {
                    TimeUnit::Second => 1_000_000_000,
                    TimeUnit::Millisecond => 1_000_000,
                    TimeUnit::Microsecond => 1_000,
                    TimeUnit::Nanosecond => 1,
                };
                let int64 = cast(array, &DataType::Int64)?;
                let int64 = int64
                    .as_any()
                    .downcast_ref::<arrow::array::Int64Array>()
                    .ok_or_else(|| {
                        ProfilerError::type_mismatch(column, "cast to Int64 produced unexpected array")
                    })?;
                (0..len)
                    .map(|i| {
                        if int64.is_null(i) {
                            None
                        } else {
                            let total = int64.value(i).checked_mul(nanos_per)?;
                            at(
                                total.div_euclid(1_000_000_000),
                                total.rem_euclid(1_000_000_000) as u32,
                            )
                        }
                    })
                    .collect()
            }
            other => {
                return Err(ProfilerError::type_mismatch(
                    column,
                    format!("expected a temporal column, found {other}"),
                ))
            }
        };
        Ok(values)
    }

    /// First `limit` rows as JSON objects keyed by column name.
    ///
    /// Numeric cells become JSON numbers, everything else its display
    /// string; absent values become JSON null.
    pub fn sample_rows(&self, limit: usize) -> ProfilerResult<Vec<Map<String, Value>>> {
        let rows = self.row_count().min(limit);
        let names = self.column_names();
        let mut numeric_cache: Vec<Option<Vec<Option<f64>>>> = Vec::new();
        for name in &names {
            if self.semantic_type(name)? == SemanticType::Numeric {
                numeric_cache.push(Some(self.numeric_values_with_nulls(name)?));
            } else {
                numeric_cache.push(None);
            }
        }

        let mut samples = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut object = Map::new();
            for (col, name) in names.iter().enumerate() {
                let array = self.batch.column(col);
                let value = if array.is_null(row) {
                    Value::Null
                } else if let Some(numeric) = &numeric_cache[col] {
                    match numeric[row].and_then(Number::from_f64) {
                        Some(number) => Value::Number(number),
                        None => Value::Null,
                    }
                } else {
                    Value::String(array_value_to_string(array, row)?)
                };
                object.insert(name.clone(), value);
            }
            samples.push(object);
        }
        Ok(samples)
    }

    /// Number of rows that are exact duplicates of an earlier row.
    pub fn duplicate_row_count(&self) -> ProfilerResult<u64> {
        if self.row_count() == 0 || self.column_count() == 0 {
            return Ok(0);
        }
        let mut seen = HashSet::with_capacity(self.row_count());
        let mut duplicates = 0u64;
        for row in 0..self.row_count() {
            let mut key = String::new();
            for col in 0..self.column_count() {
                let array = self.batch.column(col);
                if array.is_null(row) {
                    key.push('\u{0}');
                } else {
                    key.push_str(&array_value_to_string(array, row)?);
                }
                key.push('\u{1}');
            }
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        Ok(duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray, TimestampSecondArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn test_table() -> Table {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Int64, true),
            Field::new("score", DataType::Float64, true),
            Field::new("city", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![Some(25), Some(30), None, Some(40)])),
                Arc::new(Float64Array::from(vec![
                    Some(1.5),
                    Some(f64::NAN),
                    Some(2.5),
                    None,
                ])),
                Arc::new(StringArray::from(vec![
                    Some("A"),
                    Some("B"),
                    Some("A"),
                    None,
                ])),
            ],
        )
        .unwrap();
        Table::new("people", batch)
    }

    #[test]
    fn test_classification_and_partition() {
        let table = test_table();
        assert_eq!(table.semantic_type("age").unwrap(), SemanticType::Numeric);
        assert_eq!(
            table.semantic_type("city").unwrap(),
            SemanticType::Categorical
        );
        let partition = table.type_partition();
        assert_eq!(partition.numeric, vec!["age", "score"]);
        assert_eq!(partition.categorical, vec!["city"]);
        assert!(partition.temporal.is_empty());
    }

    #[test]
    fn test_numeric_extraction_skips_nulls_and_nan() {
        let table = test_table();
        assert_eq!(table.numeric_values("age").unwrap(), vec![25.0, 30.0, 40.0]);
        // NaN is reported as absent, same as null.
        assert_eq!(
            table.numeric_values_with_nulls("score").unwrap(),
            vec![Some(1.5), None, Some(2.5), None]
        );
        assert!(table.numeric_values("city").is_err());
    }

    #[test]
    fn test_string_values_and_null_count() {
        let table = test_table();
        let cities = table.string_values("city").unwrap();
        assert_eq!(cities[0].as_deref(), Some("A"));
        assert!(cities[3].is_none());
        assert_eq!(table.null_count("city").unwrap(), 1);
        assert!(table.null_count("nope").is_err());
    }

    #[test]
    fn test_sample_rows_shape() {
        let table = test_table();
        let samples = table.sample_rows(2).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0]["age"], serde_json::json!(25.0));
        assert_eq!(samples[0]["city"], serde_json::json!("A"));
        // NaN numeric cell degrades to null in the sample.
        assert_eq!(samples[1]["score"], Value::Null);
    }

    #[test]
    fn test_duplicate_row_count() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int64, true),
            Field::new("b", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 1, 2, 1])),
                Arc::new(StringArray::from(vec!["x", "x", "y", "x"])),
            ],
        )
        .unwrap();
        let table = Table::new("dups", batch);
        assert_eq!(table.duplicate_row_count().unwrap(), 2);
    }

    #[test]
    fn test_temporal_values_from_timestamps() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "ts",
            DataType::Timestamp(TimeUnit::Second, None),
            true,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(TimestampSecondArray::from(vec![
                Some(0),
                None,
                Some(86_400),
            ]))],
        )
        .unwrap();
        let table = Table::new("events", batch);
        let values = table.temporal_values("ts").unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[1].is_none());
        assert_eq!(
            values[2].unwrap().format("%Y-%m-%d").to_string(),
            "1970-01-02"
        );
    }
}

//! Time-pattern detection across declared and name-suggested time columns.

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::error::ProfilerResult;
use crate::report::{TimeAnalysis, TimeColumnSummary};
use crate::table::{SemanticType, Table, TypePartition};

/// Formats tried, in order, when parsing string candidates.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Time ranges of every column that looks time-like.
///
/// Candidates are the declared temporal columns plus any column whose name
/// contains `time` or `date` case-insensitively, deduplicated in table
/// order. A candidate where not a single value parses is recorded in
/// `skipped_columns` instead of producing a summary.
pub fn time_analysis(table: &Table, partition: &TypePartition) -> ProfilerResult<TimeAnalysis> {
    let declared: HashSet<&String> = partition.temporal.iter().collect();
    let mut candidates = Vec::new();
    for name in table.column_names() {
        let lowered = name.to_lowercase();
        if declared.contains(&name) || lowered.contains("time") || lowered.contains("date") {
            candidates.push(name);
        }
    }

    let mut columns = BTreeMap::new();
    let mut skipped_columns = Vec::new();
    for name in candidates {
        let values = if table.semantic_type(&name)? == SemanticType::Temporal {
            table.temporal_values(&name)?
        } else {
            table
                .string_values(&name)?
                .into_iter()
                .map(|v| v.as_deref().and_then(parse_timestamp))
                .collect()
        };

        let total = values.len();
        let parsed: Vec<NaiveDateTime> = values.into_iter().flatten().collect();
        let (Some(min), Some(max)) = (parsed.iter().min(), parsed.iter().max()) else {
            warn!(column = %name, "no value parsed as a timestamp, skipping column");
            skipped_columns.push(name);
            continue;
        };

        columns.insert(
            name,
            TimeColumnSummary {
                min: *min,
                max: *max,
                span_days: (*max - *min).num_days(),
                missing_count: (total - parsed.len()) as u64,
            },
        );
    }

    Ok(TimeAnalysis {
        columns,
        skipped_columns,
    })
}

/// Tries RFC 3339 first, then the fixed format list. Bare dates parse to
/// midnight.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.and_hms_opt(0, 0, 0)?);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Date32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn string_column_table(name: &str, values: Vec<Option<&str>>) -> Table {
        let schema = Arc::new(Schema::new(vec![Field::new(name, DataType::Utf8, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(values)) as _],
        )
        .unwrap();
        Table::new("t", batch)
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-03-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2024-03-15 10:30:00").is_some());
        let midnight = parse_timestamp("2024-03-15").unwrap();
        assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");
        assert!(parse_timestamp("03/15/2024").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_string_date_column_detected_by_name() {
        let table = string_column_table(
            "event_date",
            vec![Some("2024-01-01"), Some("2024-01-11"), None, Some("junk")],
        );
        let result = time_analysis(&table, &table.type_partition()).unwrap();
        let summary = &result.columns["event_date"];
        assert_eq!(summary.span_days, 10);
        // One null plus one unparseable value.
        assert_eq!(summary.missing_count, 2);
        assert!(result.skipped_columns.is_empty());
    }

    #[test]
    fn test_garbage_time_column_is_skipped() {
        let table = string_column_table("response_time", vec![Some("fast"), Some("slow")]);
        let result = time_analysis(&table, &table.type_partition()).unwrap();
        assert!(result.columns.is_empty());
        assert_eq!(result.skipped_columns, vec!["response_time"]);
    }

    #[test]
    fn test_unrelated_column_is_not_a_candidate() {
        let table = string_column_table("city", vec![Some("2024-01-01")]);
        let result = time_analysis(&table, &table.type_partition()).unwrap();
        assert!(result.columns.is_empty());
        assert!(result.skipped_columns.is_empty());
    }

    #[test]
    fn test_declared_temporal_column() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "created",
            DataType::Date32,
            true,
        )]));
        // Days since the epoch: 0 and 30.
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Date32Array::from(vec![Some(0), Some(30), None])) as _],
        )
        .unwrap();
        let table = Table::new("t", batch);
        let result = time_analysis(&table, &table.type_partition()).unwrap();
        let summary = &result.columns["created"];
        assert_eq!(summary.span_days, 30);
        assert_eq!(summary.missing_count, 1);
    }
}

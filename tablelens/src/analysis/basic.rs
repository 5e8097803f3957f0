//! Basic-info, missing-value and type-breakdown passes.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ProfilerResult;
use crate::report::{BasicInfo, ColumnTypeInfo, DataTypeBreakdown, MissingValues};
use crate::table::{Table, TypePartition};

/// Shape, memory estimate, declared types and the first few rows.
pub fn basic_info(table: &Table, sample_limit: usize) -> ProfilerResult<BasicInfo> {
    let mut column_types = BTreeMap::new();
    for name in table.column_names() {
        column_types.insert(
            name.clone(),
            ColumnTypeInfo {
                semantic: table.semantic_type(&name)?,
                arrow: table.data_type(&name)?.to_string(),
            },
        );
    }

    Ok(BasicInfo {
        row_count: table.row_count(),
        column_count: table.column_count(),
        memory_estimate_bytes: table.memory_estimate(),
        column_names: table.column_names(),
        column_types,
        sample_rows: table.sample_rows(sample_limit)?,
    })
}

/// Per-column absent-value counts and percentages.
pub fn missing_values(table: &Table) -> ProfilerResult<MissingValues> {
    let rows = table.row_count();
    let mut missing_count = BTreeMap::new();
    let mut missing_percent = BTreeMap::new();
    let mut columns_with_missing = Vec::new();
    let mut total_missing = 0u64;

    for name in table.column_names() {
        let count = table.null_count(&name)? as u64;
        let percent = if rows == 0 {
            0.0
        } else {
            count as f64 / rows as f64 * 100.0
        };
        if count > 0 {
            columns_with_missing.push(name.clone());
        }
        total_missing += count;
        missing_count.insert(name.clone(), count);
        missing_percent.insert(name, percent);
    }

    debug!(total_missing, "computed missing-value profile");

    Ok(MissingValues {
        missing_count,
        missing_percent,
        total_missing,
        columns_with_missing,
    })
}

/// Column membership lists by semantic type.
pub fn data_types(partition: &TypePartition) -> DataTypeBreakdown {
    DataTypeBreakdown {
        numeric_count: partition.numeric.len(),
        categorical_count: partition.categorical.len(),
        temporal_count: partition.temporal.len(),
        numeric_columns: partition.numeric.clone(),
        categorical_columns: partition.categorical.clone(),
        temporal_columns: partition.temporal.clone(),
    }
}

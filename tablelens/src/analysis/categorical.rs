//! Frequency analysis of the categorical columns.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::error::ProfilerResult;
use crate::report::{CategoricalSummary, ValueCount};
use crate::table::{Table, TypePartition};

/// Only the most frequent values make the report.
const MAX_VALUE_COUNTS: usize = 10;

/// Value frequencies per categorical column.
///
/// Ties on frequency break by value, ascending, so the summary is stable
/// across runs. The most and least frequent values are picked from the
/// full frequency table before it is cut to the top ten.
pub fn categorical_analysis(
    table: &Table,
    partition: &TypePartition,
) -> ProfilerResult<BTreeMap<String, CategoricalSummary>> {
    let mut summaries = BTreeMap::new();
    for name in &partition.categorical {
        let values = table.string_values(name)?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut missing_count = 0u64;
        for value in values {
            match value {
                Some(v) => *counts.entry(v).or_insert(0) += 1,
                None => missing_count += 1,
            }
        }

        let mut ordered: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount { value, count })
            .collect();
        ordered.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        let most = ordered.first();
        let least = ordered.last();
        let summary = CategoricalSummary {
            unique_count: ordered.len() as u64,
            most_frequent: most.map(|vc| vc.value.clone()),
            most_frequent_count: most.map_or(0, |vc| vc.count),
            least_frequent: least.map(|vc| vc.value.clone()),
            least_frequent_count: least.map_or(0, |vc| vc.count),
            value_counts: ordered.into_iter().take(MAX_VALUE_COUNTS).collect(),
            missing_count,
        };
        summaries.insert(name.clone(), summary);
    }
    Ok(summaries)
}

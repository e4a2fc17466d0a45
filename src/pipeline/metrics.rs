use crate::records::{EmissionRecord, YearlySummary};
use std::collections::BTreeMap;

/// Sum of every value for an element, across all years
pub fn total_by_element(records: &[EmissionRecord], element: &str) -> f64 {
    records
        .iter()
        .filter(|r| r.element == element)
        .filter_map(|r| r.value)
        .filter(|v| !v.is_nan())
        .sum()
}

/// Sum of values for an element in one year
pub fn yearly_total_by_element(records: &[EmissionRecord], year: i32, element: &str) -> f64 {
    records
        .iter()
        .filter(|r| r.year == year && r.element == element)
        .filter_map(|r| r.value)
        .filter(|v| !v.is_nan())
        .sum()
}

/// Per-year sums for an element, ordered by year
pub fn series_by_element(records: &[EmissionRecord], element: &str) -> Vec<YearlySummary> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.element == element) {
        let value = record.value.filter(|v| !v.is_nan()).unwrap_or(0.0);
        *by_year.entry(record.year).or_insert(0.0) += value;
    }

    by_year
        .into_iter()
        .map(|(year, total_value)| YearlySummary { year, total_value })
        .collect()
}

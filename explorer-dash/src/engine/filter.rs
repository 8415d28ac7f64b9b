//! Production record filtering
//!
//! Three independent predicates: family equality, day-set membership on
//! the normalized date, process-set membership. An unset predicate passes
//! everything, so the conjunction is order-independent.

use crate::store::SavedFilters;
use explorer_common::dates::normalize_day;
use explorer_common::model::ProductionRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// Distinct values available for each filter, derived from the full dataset
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    /// Families in first-seen order
    pub families: Vec<String>,
    /// Normalized days, sorted
    pub days: Vec<String>,
    /// Processes, sorted
    pub processes: Vec<String>,
}

pub fn matches_family(record: &ProductionRecord, family: Option<&str>) -> bool {
    match family {
        Some(f) => record.family == f,
        None => true,
    }
}

pub fn matches_days(record: &ProductionRecord, days: &BTreeSet<String>) -> bool {
    if days.is_empty() {
        return true;
    }
    match normalize_day(&record.date) {
        Some(day) => days.contains(&day),
        None => false,
    }
}

pub fn matches_processes(record: &ProductionRecord, processes: &BTreeSet<String>) -> bool {
    processes.is_empty() || processes.contains(&record.process)
}

/// Apply the saved filters to the dataset
pub fn apply<'a>(
    records: &'a [ProductionRecord],
    filters: &SavedFilters,
) -> Vec<&'a ProductionRecord> {
    records
        .iter()
        .filter(|r| matches_family(r, filters.family.as_deref()))
        .filter(|r| matches_days(r, &filters.days))
        .filter(|r| matches_processes(r, &filters.processes))
        .collect()
}

/// Extract the selectable filter values from the dataset
pub fn options(records: &[ProductionRecord]) -> FilterOptions {
    let mut families = Vec::new();
    let mut days = BTreeSet::new();
    let mut processes = BTreeSet::new();

    for record in records {
        if !families.contains(&record.family) {
            families.push(record.family.clone());
        }
        if let Some(day) = normalize_day(&record.date) {
            days.insert(day);
        }
        processes.insert(record.process.clone());
    }

    FilterOptions {
        families,
        days: days.into_iter().collect(),
        processes: processes.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, process: &str, family: &str) -> ProductionRecord {
        serde_json::from_value(serde_json::json!({
            "Date": date,
            "Process": process,
            "Family": family,
            "Prime Handle": 10,
            "Prime Pass": 9,
            "Prime Fail": 1,
            "Prime NTF Count": 0,
            "Prime Defect Count": 1
        }))
        .unwrap()
    }

    fn dataset() -> Vec<ProductionRecord> {
        vec![
            record("2025-03-14T08:00:00Z", "UCT", "EXPLORER"),
            record("2025-03-14T12:00:00Z", "CFC", "EXPLORER"),
            record("2025-03-15T08:00:00Z", "UCT", "EXPLORER"),
            record("2025-03-15T09:00:00Z", "UCT", "VOYAGER"),
        ]
    }

    #[test]
    fn empty_filters_pass_everything() {
        let data = dataset();
        let result = apply(&data, &SavedFilters::default());
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn predicates_compose_as_conjunction() {
        let data = dataset();
        let filters = SavedFilters {
            family: Some("EXPLORER".to_string()),
            days: ["2025-03-15".to_string()].into(),
            processes: ["UCT".to_string()].into(),
        };
        let result = apply(&data, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].family, "EXPLORER");
    }

    #[test]
    fn day_filter_works_on_normalized_dates() {
        let data = dataset();
        let filters = SavedFilters {
            days: ["2025-03-14".to_string()].into(),
            ..Default::default()
        };
        // Both timestamps on the 14th match regardless of time of day
        assert_eq!(apply(&data, &filters).len(), 2);
    }

    #[test]
    fn filtering_is_order_independent() {
        let data = dataset();
        let filters = SavedFilters {
            family: Some("EXPLORER".to_string()),
            days: ["2025-03-14".to_string(), "2025-03-15".to_string()].into(),
            processes: ["UCT".to_string()].into(),
        };

        let combined = apply(&data, &filters);

        // Apply the three predicates one at a time in every order
        let preds: [&dyn Fn(&&ProductionRecord) -> bool; 3] = [
            &|r| matches_family(r, filters.family.as_deref()),
            &|r| matches_days(r, &filters.days),
            &|r| matches_processes(r, &filters.processes),
        ];
        let orders = [
            [0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0],
        ];
        for order in orders {
            let mut result: Vec<&ProductionRecord> = data.iter().collect();
            for i in order {
                result.retain(|r| preds[i](r));
            }
            let combined_dates: Vec<&str> = combined.iter().map(|r| r.date.as_str()).collect();
            let result_dates: Vec<&str> = result.iter().map(|r| r.date.as_str()).collect();
            assert_eq!(combined_dates, result_dates, "order {:?} diverged", order);
        }
    }

    #[test]
    fn unnormalizable_date_fails_day_filter() {
        let data = vec![record("garbage", "UCT", "EXPLORER")];
        let filters = SavedFilters {
            days: ["2025-03-14".to_string()].into(),
            ..Default::default()
        };
        assert!(apply(&data, &filters).is_empty());
        // But passes when no day filter is set
        assert_eq!(apply(&data, &SavedFilters::default()).len(), 1);
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let data = dataset();
        let opts = options(&data);
        assert_eq!(opts.families, vec!["EXPLORER", "VOYAGER"]);
        assert_eq!(opts.days, vec!["2025-03-14", "2025-03-15"]);
        assert_eq!(opts.processes, vec!["CFC", "UCT"]);
    }
}

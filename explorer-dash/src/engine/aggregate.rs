//! Aggregation of filtered production records
//!
//! Records are grouped by normalized day first, then by process. Headline
//! per-process metrics come from the latest day's totals so they match the
//! most recent point on the charts.

use explorer_common::dates::normalize_day;
use explorer_common::model::ProductionRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Counter sums for one calendar day
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayTotals {
    pub day: String,
    pub handle: i64,
    pub pass: i64,
    pub fail: i64,
    pub ntf: i64,
    pub defect: i64,
    /// Handle per process within the day
    pub process_handles: BTreeMap<String, i64>,
}

/// One day of one process
#[derive(Debug, Clone, Serialize)]
pub struct DayPoint {
    pub day: String,
    pub handle: i64,
    pub pass: i64,
    pub fail: i64,
    pub ntf: i64,
    pub defect: i64,
    /// First-test yield, percent
    pub fty: f64,
}

/// Day series for one process, days ascending
#[derive(Debug, Clone, Serialize)]
pub struct ProcessSeries {
    pub process: String,
    pub points: Vec<DayPoint>,
}

/// Headline metrics from the latest day of a process series
#[derive(Debug, Clone, Serialize)]
pub struct LatestMetrics {
    pub day: String,
    pub fty: f64,
    pub ntf_rate: f64,
    pub dphu: f64,
}

/// Percentage of `part` in `whole`, 0 when the denominator is 0
pub fn rate(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 * 100.0 / whole as f64
    } else {
        0.0
    }
}

/// Sum counters per normalized day, ascending. Records whose date does not
/// normalize are skipped.
pub fn day_totals(records: &[&ProductionRecord]) -> Vec<DayTotals> {
    let mut by_day: BTreeMap<String, DayTotals> = BTreeMap::new();
    for record in records {
        let Some(day) = normalize_day(&record.date) else {
            continue;
        };
        let totals = by_day.entry(day.clone()).or_insert_with(|| DayTotals {
            day,
            ..Default::default()
        });
        totals.handle += record.handle;
        totals.pass += record.pass;
        totals.fail += record.fail;
        totals.ntf += record.ntf;
        totals.defect += record.defect;
        *totals
            .process_handles
            .entry(record.process.clone())
            .or_default() += record.handle;
    }
    by_day.into_values().collect()
}

/// Group by process, then by day, in the configured display order
pub fn process_series(records: &[&ProductionRecord], order: &[String]) -> Vec<ProcessSeries> {
    let mut by_process: BTreeMap<String, BTreeMap<String, DayPoint>> = BTreeMap::new();
    for record in records {
        let Some(day) = normalize_day(&record.date) else {
            continue;
        };
        let point = by_process
            .entry(record.process.clone())
            .or_default()
            .entry(day.clone())
            .or_insert_with(|| DayPoint {
                day,
                handle: 0,
                pass: 0,
                fail: 0,
                ntf: 0,
                defect: 0,
                fty: 0.0,
            });
        point.handle += record.handle;
        point.pass += record.pass;
        point.fail += record.fail;
        point.ntf += record.ntf;
        point.defect += record.defect;
    }

    let found: BTreeSet<String> = by_process.keys().cloned().collect();
    order_processes(&found, order)
        .into_iter()
        .filter_map(|process| {
            let days = by_process.remove(&process)?;
            let points = days
                .into_values()
                .map(|mut p| {
                    p.fty = rate(p.pass, p.handle);
                    p
                })
                .collect();
            Some(ProcessSeries { process, points })
        })
        .collect()
}

/// Metrics from the latest day of the series
pub fn latest_metrics(series: &ProcessSeries) -> Option<LatestMetrics> {
    let last = series.points.last()?;
    Some(LatestMetrics {
        day: last.day.clone(),
        fty: rate(last.pass, last.handle),
        ntf_rate: rate(last.ntf, last.handle),
        dphu: rate(last.defect, last.handle),
    })
}

/// Configured display order first, unknown processes appended alphabetically
pub fn order_processes(found: &BTreeSet<String>, order: &[String]) -> Vec<String> {
    let mut result: Vec<String> = order.iter().filter(|p| found.contains(*p)).cloned().collect();
    for process in found {
        if !order.contains(process) {
            result.push(process.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, process: &str, counts: [i64; 5]) -> ProductionRecord {
        serde_json::from_value(serde_json::json!({
            "Date": date,
            "Process": process,
            "Family": "EXPLORER",
            "Prime Handle": counts[0],
            "Prime Pass": counts[1],
            "Prime Fail": counts[2],
            "Prime NTF Count": counts[3],
            "Prime Defect Count": counts[4]
        }))
        .unwrap()
    }

    #[test]
    fn sums_counters_per_day() {
        let data = vec![
            record("2025-03-14T08:00:00Z", "UCT", [100, 95, 5, 2, 3]),
            record("2025-03-14T16:00:00Z", "CFC", [50, 48, 2, 1, 1]),
            record("2025-03-15T08:00:00Z", "UCT", [80, 78, 2, 0, 2]),
        ];
        let refs: Vec<&ProductionRecord> = data.iter().collect();
        let totals = day_totals(&refs);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].day, "2025-03-14");
        assert_eq!(totals[0].handle, 150);
        assert_eq!(totals[0].pass, 143);
        assert_eq!(totals[0].defect, 4);
        assert_eq!(totals[0].process_handles["UCT"], 100);
        assert_eq!(totals[0].process_handles["CFC"], 50);
        assert_eq!(totals[1].day, "2025-03-15");
        assert_eq!(totals[1].handle, 80);
    }

    #[test]
    fn skips_unnormalizable_dates() {
        let data = vec![
            record("garbage", "UCT", [100, 95, 5, 0, 0]),
            record("2025-03-14", "UCT", [10, 10, 0, 0, 0]),
        ];
        let refs: Vec<&ProductionRecord> = data.iter().collect();
        let totals = day_totals(&refs);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].handle, 10);
    }

    #[test]
    fn series_follow_configured_order() {
        let data = vec![
            record("2025-03-14", "CFC", [10, 10, 0, 0, 0]),
            record("2025-03-14", "UCT", [10, 9, 1, 0, 0]),
            record("2025-03-14", "ZZTOP", [5, 5, 0, 0, 0]),
        ];
        let refs: Vec<&ProductionRecord> = data.iter().collect();
        let order = vec!["UCT".to_string(), "CFC".to_string()];
        let series = process_series(&refs, &order);

        let names: Vec<&str> = series.iter().map(|s| s.process.as_str()).collect();
        assert_eq!(names, vec!["UCT", "CFC", "ZZTOP"]);
    }

    #[test]
    fn latest_metrics_use_last_day_only() {
        let data = vec![
            record("2025-03-14", "UCT", [100, 50, 50, 10, 20]),
            record("2025-03-15", "UCT", [100, 90, 10, 5, 2]),
        ];
        let refs: Vec<&ProductionRecord> = data.iter().collect();
        let series = process_series(&refs, &[]);
        let metrics = latest_metrics(&series[0]).unwrap();

        assert_eq!(metrics.day, "2025-03-15");
        assert_eq!(metrics.fty, 90.0);
        assert_eq!(metrics.ntf_rate, 5.0);
        assert_eq!(metrics.dphu, 2.0);
    }

    #[test]
    fn rate_guards_zero_denominator() {
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(rate(0, 100), 0.0);
        assert_eq!(rate(50, 200), 25.0);
    }
}

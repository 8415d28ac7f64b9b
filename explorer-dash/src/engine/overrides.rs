//! Manual override resolution and day KPI derivation
//!
//! Overrides never touch the aggregated totals; they are resolved at
//! render time, so clearing one immediately falls back to the API value.

use crate::engine::aggregate::DayTotals;
use explorer_common::model::parse_count;
use serde::Serialize;
use std::collections::BTreeMap;

/// Day KPI field names an operator can override
pub const INPUT: &str = "input";
pub const OUTPUT: &str = "output";
pub const DEFECTS: &str = "defects";

/// KPI traffic-light band on DPHU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiBand {
    Good,
    Warn,
    Bad,
}

/// DPHU > 7 is bad, >= 5 warns
pub fn band(dphu: f64) -> KpiBand {
    if dphu > 7.0 {
        KpiBand::Bad
    } else if dphu >= 5.0 {
        KpiBand::Warn
    } else {
        KpiBand::Good
    }
}

/// Defects per hundred units. Zero defects is 0 regardless of input;
/// zero input with defects present is also 0 rather than infinite.
pub fn dphu(defects: i64, input: i64) -> f64 {
    if defects == 0 || input <= 0 {
        0.0
    } else {
        defects as f64 * 100.0 / input as f64
    }
}

/// Manual entries for one day: field -> raw value
pub type DayManual = BTreeMap<String, String>;

/// The effective value for a field: the manual entry when present and
/// non-empty, else the API-derived value.
pub fn effective(manual: Option<&DayManual>, field: &str, api_value: i64) -> i64 {
    match manual.and_then(|m| m.get(field)) {
        Some(v) if !v.trim().is_empty() => parse_count(v),
        _ => api_value,
    }
}

/// Override-resolved KPIs for one day
#[derive(Debug, Clone, Serialize)]
pub struct DayKpis {
    pub day: String,
    pub input: i64,
    pub output: i64,
    pub defects: i64,
    pub dphu: f64,
    pub band: KpiBand,
    /// Manual station fields entered for the day (raw values)
    pub manual_fields: BTreeMap<String, String>,
}

/// Resolve one day's KPIs against the family's manual overrides
pub fn resolve_day(
    totals: &DayTotals,
    manual: &BTreeMap<String, DayManual>,
    manual_fields: &[String],
) -> DayKpis {
    let day_manual = manual.get(&totals.day);
    let input = effective(day_manual, INPUT, totals.handle);
    let output = effective(day_manual, OUTPUT, totals.pass);
    let defects = effective(day_manual, DEFECTS, totals.defect);
    let d = dphu(defects, input);

    let mut fields = BTreeMap::new();
    if let Some(m) = day_manual {
        for field in manual_fields {
            if let Some(value) = m.get(field) {
                if !value.trim().is_empty() {
                    fields.insert(field.clone(), value.clone());
                }
            }
        }
    }

    DayKpis {
        day: totals.day.clone(),
        input,
        output,
        defects,
        dphu: d,
        band: band(d),
        manual_fields: fields,
    }
}

/// Override-resolved summary over the filtered period
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub days: usize,
    pub input: i64,
    pub output: i64,
    pub defects: i64,
    pub dphu: f64,
    pub band: KpiBand,
    /// Handle per process across the period
    pub process_handles: BTreeMap<String, i64>,
    /// Sums of the numeric manual station fields
    pub manual_totals: BTreeMap<String, i64>,
}

/// Summarize the period from per-day totals and the family's overrides
pub fn period_summary(
    totals: &[DayTotals],
    manual: &BTreeMap<String, DayManual>,
    manual_fields: &[String],
) -> PeriodSummary {
    let mut input = 0;
    let mut output = 0;
    let mut defects = 0;
    let mut process_handles: BTreeMap<String, i64> = BTreeMap::new();
    let mut manual_totals: BTreeMap<String, i64> = BTreeMap::new();

    for day in totals {
        let day_manual = manual.get(&day.day);
        input += effective(day_manual, INPUT, day.handle);
        output += effective(day_manual, OUTPUT, day.pass);
        defects += effective(day_manual, DEFECTS, day.defect);
        for (process, handle) in &day.process_handles {
            *process_handles.entry(process.clone()).or_default() += handle;
        }
        if let Some(m) = day_manual {
            for field in manual_fields {
                if let Some(value) = m.get(field) {
                    if !value.trim().is_empty() {
                        *manual_totals.entry(field.clone()).or_default() += parse_count(value);
                    }
                }
            }
        }
    }

    let d = dphu(defects, input);
    PeriodSummary {
        days: totals.len(),
        input,
        output,
        defects,
        dphu: d,
        band: band(d),
        process_handles,
        manual_totals,
    }
}

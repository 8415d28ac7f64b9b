//! Per-process report endpoint: day series, latest metrics, failure table

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::engine::{aggregate, failures, filter};
use crate::store::{failure_key, FailureNote};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub reports: Vec<ProcessReport>,
}

#[derive(Debug, Serialize)]
pub struct ProcessReport {
    pub process: String,
    /// Configured FTY target (percent), when one exists
    pub fty_target: Option<f64>,
    /// Metrics from the latest day shown
    pub latest: Option<aggregate::LatestMetrics>,
    pub points: Vec<aggregate::DayPoint>,
    pub failures: Vec<FailureRow>,
    /// Every testcode seen for the process
    pub testcodes: Vec<String>,
    /// Saved selection; absent when never saved (all testcodes shown)
    pub selection: Option<BTreeSet<String>>,
}

#[derive(Debug, Serialize)]
pub struct FailureRow {
    pub testcode: String,
    pub pfail: i64,
    pub pfailph: String,
    pub pntf: i64,
    pub note: Option<FailureNote>,
    pub has_image: bool,
}

/// GET /api/reports
///
/// One report per process present in the filtered production data, in the
/// configured station order.
pub async fn get_reports(State(state): State<AppState>) -> Json<ReportsResponse> {
    let filters = state.store.filters().await;
    let data = state.data.read().await;
    let records = filter::apply(&data.production, &filters);
    let series = aggregate::process_series(&records, &state.config.process_order);

    let mut reports = Vec::with_capacity(series.len());
    for s in series {
        let selection = state.store.testcode_selection(&s.process).await;
        let rows = failures::top_failures(&data.failures, &s.process, selection.as_ref());

        let mut failure_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let key = failure_key(&s.process, &row.testcode);
            failure_rows.push(FailureRow {
                testcode: row.testcode.clone(),
                pfail: row.pfail,
                pfailph: row.pfailph.clone(),
                pntf: row.pntf,
                note: state.store.note(&key).await,
                has_image: state.store.has_image(&key).await,
            });
        }

        reports.push(ProcessReport {
            fty_target: state.config.fty_target(&s.process),
            latest: aggregate::latest_metrics(&s),
            testcodes: failures::testcodes(&data.failures, &s.process),
            selection,
            failures: failure_rows,
            points: s.points,
            process: s.process,
        });
    }

    Json(ReportsResponse { reports })
}

//! Daily KPI cards endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::engine::{aggregate, filter, overrides};
use crate::AppState;

/// Period summary plus one card per day, newest first
#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub summary: overrides::PeriodSummary,
    pub days: Vec<DayCard>,
}

#[derive(Debug, Serialize)]
pub struct DayCard {
    #[serde(flatten)]
    pub kpis: overrides::DayKpis,
    /// Handle per process within the day
    pub process_handles: std::collections::BTreeMap<String, i64>,
}

/// GET /api/cards
///
/// Filtered records grouped per day, with manual overrides resolved
/// against the selected family at render time.
pub async fn get_cards(State(state): State<AppState>) -> Json<CardsResponse> {
    let filters = state.store.filters().await;
    let manual = match &filters.family {
        Some(family) => state.store.manual_for(family).await,
        None => Default::default(),
    };

    let data = state.data.read().await;
    let records = filter::apply(&data.production, &filters);
    let totals = aggregate::day_totals(&records);

    let summary = overrides::period_summary(&totals, &manual, &state.config.manual_fields);
    let mut days: Vec<DayCard> = totals
        .iter()
        .map(|t| DayCard {
            kpis: overrides::resolve_day(t, &manual, &state.config.manual_fields),
            process_handles: t.process_handles.clone(),
        })
        .collect();
    days.reverse();

    Json(CardsResponse { summary, days })
}

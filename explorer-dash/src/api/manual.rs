//! Manual override endpoint

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::api::ApiError;
use crate::engine::{aggregate, filter, overrides};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ManualRequest {
    /// Normalized day (YYYY-MM-DD)
    pub day: String,
    pub field: String,
    /// Raw entered value; empty clears the override
    pub value: String,
}

/// PUT /api/manual
///
/// Saves a manual override for the selected family and returns the
/// re-resolved KPIs for the day. Requires a family selection, since
/// overrides are keyed by family.
pub async fn put_manual(
    State(state): State<AppState>,
    Json(req): Json<ManualRequest>,
) -> Result<Json<overrides::DayKpis>, ApiError> {
    let filters = state.store.filters().await;
    let family = filters
        .family
        .clone()
        .ok_or_else(|| ApiError::BadRequest("no family selected".to_string()))?;

    let known_field = matches!(
        req.field.as_str(),
        overrides::INPUT | overrides::OUTPUT | overrides::DEFECTS
    ) || state.config.manual_fields.contains(&req.field);
    if !known_field {
        return Err(ApiError::BadRequest(format!(
            "unknown manual field: {}",
            req.field
        )));
    }

    state
        .store
        .set_manual(&family, &req.day, &req.field, req.value)
        .await?;

    // Re-resolve the day against the updated overrides
    let manual = state.store.manual_for(&family).await;
    let data = state.data.read().await;
    let records = filter::apply(&data.production, &filters);
    let totals = aggregate::day_totals(&records);
    let day_totals = totals
        .iter()
        .find(|t| t.day == req.day)
        .cloned()
        .unwrap_or_else(|| aggregate::DayTotals {
            day: req.day.clone(),
            ..Default::default()
        });

    Ok(Json(overrides::resolve_day(
        &day_totals,
        &manual,
        &state.config.manual_fields,
    )))
}

//! Data refresh and storage clearing endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::ApiError;
use crate::AppState;

/// POST /api/refresh
///
/// Refetches both upstream datasets and swaps them in. Operator state is
/// untouched.
pub async fn refresh_data(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (production, failures) = tokio::try_join!(
        state.client.fetch_production(),
        state.client.fetch_failures()
    )
    .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    let mut data = state.data.write().await;
    data.production = production;
    data.failures = failures;

    Ok(Json(json!({
        "production_records": data.production.len(),
        "failure_records": data.failures.len(),
    })))
}

/// DELETE /api/storage
///
/// Removes every persisted blob: filters, manual overrides, failure notes
/// and images, issue statuses, objectives.
pub async fn clear_storage(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.clear_all().await?;
    Ok(Json(json!({ "cleared": true })))
}

//! Filter selection endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::ApiError;
use crate::engine::filter;
use crate::store::SavedFilters;
use crate::AppState;

/// Current filters plus the values available to choose from
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub filters: SavedFilters,
    pub options: filter::FilterOptions,
}

/// GET /api/filters
pub async fn get_filters(State(state): State<AppState>) -> Json<FiltersResponse> {
    let data = state.data.read().await;
    Json(FiltersResponse {
        filters: state.store.filters().await,
        options: filter::options(&data.production),
    })
}

#[derive(Debug, Serialize)]
pub struct PutFiltersResponse {
    pub filters: SavedFilters,
    /// Records matching the new selection
    pub filtered: usize,
}

/// PUT /api/filters
///
/// Replaces the saved filter selection. Changing the family also rewrites
/// every objective's product to the new family.
pub async fn put_filters(
    State(state): State<AppState>,
    Json(filters): Json<SavedFilters>,
) -> Result<Json<PutFiltersResponse>, ApiError> {
    state.store.set_filters(filters.clone()).await?;
    if let Some(family) = &filters.family {
        state.store.sync_objectives_product(family).await?;
    }

    let data = state.data.read().await;
    let filtered = filter::apply(&data.production, &filters).len();
    Ok(Json(PutFiltersResponse { filters, filtered }))
}

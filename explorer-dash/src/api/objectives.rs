//! Objectives CRUD endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::ApiError;
use crate::objectives::{self, Objective, ObjectivePriority, ObjectiveStats, ObjectiveStatus};
use crate::AppState;

/// Product used when no family filter is selected yet
const DEFAULT_PRODUCT: &str = "Explorer";

#[derive(Debug, Serialize)]
pub struct ObjectivesResponse {
    pub objectives: Vec<Objective>,
    pub stats: ObjectiveStats,
}

/// GET /api/objectives
pub async fn list_objectives(State(state): State<AppState>) -> Json<ObjectivesResponse> {
    let objectives = state.store.objectives().await;
    let stats = objectives::stats(&objectives);
    Json(ObjectivesResponse { objectives, stats })
}

#[derive(Debug, Deserialize)]
pub struct CreateObjectiveRequest {
    pub description: String,
    #[serde(default)]
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub priority: ObjectivePriority,
}

/// POST /api/objectives
///
/// Creates an objective for the selected family
pub async fn create_objective(
    State(state): State<AppState>,
    Json(req): Json<CreateObjectiveRequest>,
) -> Result<Json<Objective>, ApiError> {
    if req.description.trim().is_empty() {
        return Err(ApiError::BadRequest("empty description".to_string()));
    }
    let product = state
        .store
        .filters()
        .await
        .family
        .unwrap_or_else(|| DEFAULT_PRODUCT.to_string());

    let objective = Objective::new(product, req.description, req.status, req.priority);
    state.store.add_objective(objective.clone()).await?;
    Ok(Json(objective))
}

#[derive(Debug, Deserialize)]
pub struct UpdateObjectiveRequest {
    pub description: Option<String>,
    pub status: Option<ObjectiveStatus>,
    pub priority: Option<ObjectivePriority>,
}

/// PUT /api/objectives/:id
pub async fn update_objective(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateObjectiveRequest>,
) -> Result<Json<Objective>, ApiError> {
    let mut objective = state
        .store
        .objectives()
        .await
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("unknown objective: {}", id)))?;

    if let Some(description) = req.description {
        objective.description = description;
    }
    if let Some(status) = req.status {
        objective.status = status;
    }
    if let Some(priority) = req.priority {
        objective.priority = priority;
    }
    objective.updated_at = chrono::Utc::now();

    state.store.update_objective(objective.clone()).await?;
    Ok(Json(objective))
}

/// DELETE /api/objectives/:id
pub async fn delete_objective(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_objective(id).await? {
        return Err(ApiError::NotFound(format!("unknown objective: {}", id)));
    }
    Ok(Json(json!({ "deleted": id })))
}

//! Issue tracking endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::issues::{self, Issue, IssueStats, IssueStatus};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct IssuesResponse {
    pub issues: Vec<Issue>,
    pub stats: IssueStats,
}

/// GET /api/issues
pub async fn list_issues(State(state): State<AppState>) -> Json<IssuesResponse> {
    let states = state.store.issue_states().await;
    Json(IssuesResponse {
        issues: issues::catalog(&states),
        stats: issues::stats(&states),
    })
}

#[derive(Debug, Deserialize)]
pub struct IssueStatusRequest {
    pub status: IssueStatus,
}

/// PUT /api/issues/:id
pub async fn put_issue_status(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<IssueStatusRequest>,
) -> Result<Json<IssuesResponse>, ApiError> {
    if !issues::is_known_issue(id) {
        return Err(ApiError::NotFound(format!("unknown issue: {}", id)));
    }
    state.store.set_issue_status(id, req.status).await?;

    let states = state.store.issue_states().await;
    Ok(Json(IssuesResponse {
        issues: issues::catalog(&states),
        stats: issues::stats(&states),
    }))
}

//! Failure annotation endpoints: notes, images, testcode selections

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use crate::api::ApiError;
use crate::store::{failure_key, FailureNote};
use crate::AppState;

/// PUT /api/failures/:process/:testcode/note
pub async fn put_failure_note(
    State(state): State<AppState>,
    Path((process, testcode)): Path<(String, String)>,
    Json(note): Json<FailureNote>,
) -> Result<Json<Value>, ApiError> {
    let key = failure_key(&process, &testcode);
    state.store.set_note(&key, note).await?;
    Ok(Json(json!({ "saved": key })))
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    /// Image as a data URL
    pub image: String,
}

/// PUT /api/failures/:process/:testcode/image
pub async fn put_failure_image(
    State(state): State<AppState>,
    Path((process, testcode)): Path<(String, String)>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.image.is_empty() {
        return Err(ApiError::BadRequest("empty image".to_string()));
    }
    let key = failure_key(&process, &testcode);
    state.store.set_image(&key, Some(req.image)).await?;
    Ok(Json(json!({ "saved": key })))
}

/// DELETE /api/failures/:process/:testcode/image
pub async fn delete_failure_image(
    State(state): State<AppState>,
    Path((process, testcode)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let key = failure_key(&process, &testcode);
    state.store.set_image(&key, None).await?;
    Ok(Json(json!({ "removed": key })))
}

#[derive(Debug, Deserialize)]
pub struct TestcodeSelectionRequest {
    pub testcodes: BTreeSet<String>,
}

/// PUT /api/failures/:process/testcodes
///
/// Saves which testcodes to show for the process. Saving an empty set
/// hides every row; the selection only disappears with a storage clear.
pub async fn put_testcode_selection(
    State(state): State<AppState>,
    Path(process): Path<String>,
    Json(req): Json<TestcodeSelectionRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .set_testcode_selection(&process, req.testcodes)
        .await?;
    Ok(Json(json!({ "saved": process })))
}

//! Backup export endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::store::StoreData;
use crate::AppState;

/// Everything the operator has entered, in one document
#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub exported_at: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub production_records: usize,
    pub failure_records: usize,
    #[serde(flatten)]
    pub store: StoreData,
}

/// GET /api/backup
pub async fn get_backup(State(state): State<AppState>) -> Json<BackupResponse> {
    let data = state.data.read().await;
    Json(BackupResponse {
        exported_at: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        production_records: data.production.len(),
        failure_records: data.failures.len(),
        store: state.store.export().await,
    })
}

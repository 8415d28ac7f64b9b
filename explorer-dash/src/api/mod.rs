//! HTTP API handlers for explorer-dash

pub mod backup;
pub mod buildinfo;
pub mod cards;
pub mod failures;
pub mod filters;
pub mod health;
pub mod issues;
pub mod manual;
pub mod objectives;
pub mod reports;
pub mod storage;
pub mod ui;

pub use backup::get_backup;
pub use buildinfo::get_build_info;
pub use cards::get_cards;
pub use failures::{
    delete_failure_image, put_failure_image, put_failure_note, put_testcode_selection,
};
pub use filters::{get_filters, put_filters};
pub use health::health_routes;
pub use issues::{list_issues, put_issue_status};
pub use manual::put_manual;
pub use objectives::{create_objective, delete_objective, list_objectives, update_objective};
pub use reports::get_reports;
pub use storage::{clear_storage, refresh_data};
pub use ui::{serve_app_js, serve_index};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler error mapped to a JSON error body
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<explorer_common::Error> for ApiError {
    fn from(e: explorer_common::Error) -> Self {
        use explorer_common::Error;
        match e {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Fetch(msg) => ApiError::BadGateway(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

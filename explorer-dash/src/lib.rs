//! explorer-dash library - manufacturing quality dashboard
//!
//! Fetches production and failure records from the upstream export,
//! derives the cards/reports the dashboard shows, and persists operator
//! annotations (filters, manual overrides, failure notes and images,
//! issue statuses, objectives) as JSON blobs under the root folder.

use axum::Router;
use explorer_common::config::DashConfig;
use explorer_common::model::{FailureRecord, ProductionRecord};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod api;
pub mod client;
pub mod engine;
pub mod issues;
pub mod objectives;
pub mod store;

use client::UpstreamClient;
use store::Store;

/// Both upstream datasets, swapped wholesale on refresh
#[derive(Debug, Default)]
pub struct Dataset {
    pub production: Vec<ProductionRecord>,
    pub failures: Vec<FailureRecord>,
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashConfig>,
    pub store: Arc<Store>,
    pub client: Arc<UpstreamClient>,
    pub data: Arc<RwLock<Dataset>>,
}

impl AppState {
    pub fn new(
        config: DashConfig,
        store: Store,
        client: UpstreamClient,
        data: Dataset,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            client: Arc::new(client),
            data: Arc::new(RwLock::new(data)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post, put};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/api/build_info", get(api::get_build_info))
        .route("/api/filters", get(api::get_filters).put(api::put_filters))
        .route("/api/cards", get(api::get_cards))
        .route("/api/reports", get(api::get_reports))
        .route("/api/manual", put(api::put_manual))
        .route(
            "/api/failures/:process/:testcode/note",
            put(api::put_failure_note),
        )
        .route(
            "/api/failures/:process/:testcode/image",
            put(api::put_failure_image).delete(api::delete_failure_image),
        )
        .route(
            "/api/failures/:process/testcodes",
            put(api::put_testcode_selection),
        )
        .route("/api/issues", get(api::list_issues))
        .route("/api/issues/:id", put(api::put_issue_status))
        .route(
            "/api/objectives",
            get(api::list_objectives).post(api::create_objective),
        )
        .route(
            "/api/objectives/:id",
            put(api::update_objective).delete(api::delete_objective),
        )
        .route("/api/backup", get(api::get_backup))
        .route("/api/refresh", post(api::refresh_data))
        .route("/api/storage", delete(api::clear_storage))
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub mod apidoc;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod synch;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use config::Config;
use synch::job_store::JobStore;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub http: reqwest::Client,
    pub jobs: Arc<JobStore>,
}

impl AppState {
    pub fn new(cfg: Config, http: reqwest::Client) -> Self {
        let jobs = Arc::new(JobStore::new(cfg.job_ttl, cfg.job_store_capacity));
        Self { cfg, http, jobs }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Med42 result payloads can outgrow axum's 2 MB default
    let webhook_limit = DefaultBodyLimit::max(state.cfg.webhook_max_body_bytes);

    Router::new()
        .route("/", get(routes::health::health_check))
        .route("/analyze", post(routes::analyze::analyze))
        .route(
            "/webhook",
            post(routes::webhook::receive_webhook).layer(webhook_limit),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", apidoc::ApiDoc::openapi()))
        .with_state(state)
}

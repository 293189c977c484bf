#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use med42_gateway::{AppState, build_router, config::Config};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";

/// Gateway settings pointing at a mock Med42 under `/v1`.
pub fn config_for(server: &MockServer) -> Config {
    let mut cfg = Config::with_api_url(Url::parse(&format!("{}/v1", server.uri())).unwrap());
    cfg.med42_api_key = Some(API_KEY.to_string());
    cfg.med42_timeout = Duration::from_secs(2);
    cfg
}

pub fn state_for(cfg: Config) -> AppState {
    AppState::new(cfg, reqwest::Client::new())
}

pub fn app(state: &AppState) -> Router {
    build_router(state.clone())
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::HOST, "gw.local")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();
    read(res).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(res).await
}

async fn read(res: axum::response::Response) -> (StatusCode, Value) {
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

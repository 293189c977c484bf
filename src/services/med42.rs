use crate::{
    config::Config,
    models::med42::{AnalyzePayload, ChatPayload, Med42Reply},
};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Med42Error {
    #[error("med42 request timed out")]
    Timeout,
    #[error("med42 connection failed: {0}")]
    Connection(String),
    #[error("med42 status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("med42 json error: {0}")]
    Decode(String),
    #[error("med42 request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for Med42Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Med42Error::Timeout
        } else if err.is_connect() {
            Med42Error::Connection(err.to_string())
        } else if err.is_decode() {
            Med42Error::Decode(err.to_string())
        } else {
            Med42Error::Request(err.to_string())
        }
    }
}

/// Synchronous Q&A against the Med42 chat endpoint.
pub async fn send_chat(
    http: &reqwest::Client,
    cfg: &Config,
    body: &ChatPayload,
) -> Result<Med42Reply, Med42Error> {
    post(http, cfg, "chat", body).await
}

/// Starts an asynchronous Med42 analysis; the result arrives on the webhook.
pub async fn submit_analysis(
    http: &reqwest::Client,
    cfg: &Config,
    body: &AnalyzePayload,
) -> Result<Med42Reply, Med42Error> {
    post(http, cfg, "analyze", body).await
}

async fn post<B: Serialize>(
    http: &reqwest::Client,
    cfg: &Config,
    path: &str,
    body: &B,
) -> Result<Med42Reply, Med42Error> {
    let url = cfg
        .med42_api_url
        .join(path)
        .map_err(|e| Med42Error::Request(e.to_string()))?;

    let mut req = http.post(url).timeout(cfg.med42_timeout).json(body);
    if let Some(api_key) = &cfg.med42_api_key {
        req = req.bearer_auth(api_key);
    }

    let res = req.send().await?;

    // Med42 signals success with exactly 200; anything else is a failure
    if res.status() != StatusCode::OK {
        let status = res.status();
        let body = res
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        return Err(Med42Error::Status { status, body });
    }

    // Read the body first so a timeout mid-body is still reported as a timeout
    let bytes = res.bytes().await?;
    serde_json::from_slice::<Med42Reply>(&bytes).map_err(|e| Med42Error::Decode(e.to_string()))
}

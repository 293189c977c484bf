use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use tracing::{info, warn};

use crate::{
    AppState,
    handlers::{self, GatewayError},
    models::{
        analysis::{AnalysisRequest, GatewayResult},
        common::ErrorMessage,
    },
    utils::default_webhook_url,
};

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "gateway",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Answer, job id, or fallback payload; upstream failures are reported here too", body = GatewayResult),
        (status = 400, description = "Text field missing or empty", body = ErrorMessage)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GatewayResult>, (StatusCode, Json<ErrorMessage>)> {
    // Anything that does not decode into a request has no usable text
    let req: AnalysisRequest = serde_json::from_slice(&body).map_err(|err| {
        warn!("Rejecting undecodable analyze body: {err}");
        bad_request()
    })?;

    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());
    let callback = default_webhook_url(&state.cfg, host);

    info!(
        "Incoming analyze request (mode={:?})",
        req.dispatch_mode()
    );

    match handlers::dispatch::submit(&state, req, callback).await {
        Ok(result) => Ok(Json(result)),
        Err(GatewayError::Validation) => Err(bad_request()),
        // submit folds every other failure into a result
        Err(other) => Ok(Json(GatewayResult::error(other.to_string()))),
    }
}

fn bad_request() -> (StatusCode, Json<ErrorMessage>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorMessage::new(GatewayError::Validation.to_string())),
    )
}

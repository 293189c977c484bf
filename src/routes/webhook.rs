use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::{
    AppState,
    handlers::{self, WebhookError},
    models::webhook::{AckResult, AckStatus, WebhookEvent},
};

/// Med42 retries any acknowledgement that is not a 200, so every outcome but
/// strict-mode rejection is answered with 200.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhooks",
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Webhook acknowledged", body = AckResult),
        (status = 400, description = "No JSON payload (only with WEBHOOK_STRICT)", body = AckResult)
    )
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<AckResult>) {
    let payload = serde_json::from_slice::<JsonValue>(&body).ok();

    match handlers::webhook::receive(&state, payload).await {
        Ok(ack) => (StatusCode::OK, Json(ack)),
        Err(WebhookError::MissingPayload) => {
            warn!("Warning: No JSON payload received");
            let ack = AckResult::new(AckStatus::Handled)
                .error(WebhookError::MissingPayload.to_string())
                .with_fallback();
            if state.cfg.webhook_strict {
                let ack = AckResult {
                    status: AckStatus::Rejected,
                    ..ack
                };
                (StatusCode::BAD_REQUEST, Json(ack))
            } else {
                (StatusCode::OK, Json(ack))
            }
        }
        Err(err @ WebhookError::Malformed(_)) => {
            error!("Webhook error: {err}");
            let ack = AckResult::new(AckStatus::Handled)
                .error("Internal webhook processing error")
                .with_fallback();
            (StatusCode::OK, Json(ack))
        }
    }
}

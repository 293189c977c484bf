use crate::{
    AppState,
    handlers::GatewayError,
    models::{
        analysis::{AnalysisRequest, DispatchMode, GatewayResult},
        med42::{AnalyzePayload, ChatPayload},
    },
    services::med42::{send_chat, submit_analysis},
    synch::job_store::JobRecord,
    utils::truncate_chars,
};
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Relays one question to Med42 in the mode the request selects.
///
/// Only `GatewayError::Validation` escapes; every upstream failure is logged
/// and folded into a renderable `GatewayResult`.
pub async fn submit(
    state: &AppState,
    req: AnalysisRequest,
    default_webhook_url: String,
) -> Result<GatewayResult, GatewayError> {
    let text = match req.text.as_deref() {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => return Err(GatewayError::Validation),
    };

    let mode = req.dispatch_mode();
    if let Some(lang) = &req.language {
        debug!("analyze request language={lang}");
    }
    let metadata = req.metadata.clone();

    let outcome = match mode {
        DispatchMode::DirectChat => direct_chat(state, text, metadata).await,
        DispatchMode::Med42Job => {
            let webhook_url = req
                .explicit_webhook_url()
                .map(str::to_string)
                .unwrap_or(default_webhook_url);
            med42_job(state, text, webhook_url, metadata).await
        }
    };

    Ok(outcome.unwrap_or_else(|err| fallback_for(err, mode, state.cfg.med42_timeout)))
}

async fn direct_chat(
    state: &AppState,
    text: String,
    metadata: Value,
) -> Result<GatewayResult, GatewayError> {
    let body = ChatPayload { text, metadata };
    let reply = send_chat(&state.http, &state.cfg, &body).await?;

    match reply.answer() {
        Some(answer) => Ok(GatewayResult::chat_answer(answer.to_string())),
        None => Err(GatewayError::UpstreamEmptyResult),
    }
}

async fn med42_job(
    state: &AppState,
    text: String,
    webhook_url: String,
    metadata: Value,
) -> Result<GatewayResult, GatewayError> {
    let body = AnalyzePayload {
        text,
        webhook_url,
        metadata,
    };
    let reply = submit_analysis(&state.http, &state.cfg, &body).await?;

    let job_id = reply.job_id().ok_or(GatewayError::UpstreamEmptyResult)?;
    info!("Med42 analysis started (job_id={job_id})");

    state
        .jobs
        .record(
            job_id.clone(),
            JobRecord {
                webhook_url: body.webhook_url,
                metadata: body.metadata,
                submitted_at: Instant::now(),
            },
        )
        .await;

    Ok(GatewayResult::job_started(job_id))
}

fn fallback_for(err: GatewayError, mode: DispatchMode, timeout: Duration) -> GatewayResult {
    use DispatchMode::{DirectChat, Med42Job};

    match (err, mode) {
        (GatewayError::UpstreamEmptyResult, DirectChat) => {
            warn!("Med42 chat returned 200 without an answer");
            GatewayResult::warning("No response from AI")
        }
        (GatewayError::UpstreamEmptyResult, Med42Job) => {
            warn!("Med42 analyze returned 200 but no job_id");
            GatewayResult::warning("Analysis may have started but no job ID returned")
        }
        (GatewayError::UpstreamTimeout, DirectChat) => {
            error!("Med42 chat timed out after {timeout:?}");
            GatewayResult::error("AI response timeout")
        }
        (GatewayError::UpstreamTimeout, Med42Job) => {
            error!("Med42 analyze timed out after {timeout:?}");
            GatewayResult::error("API request timeout")
        }
        (GatewayError::UpstreamConnection(e), DirectChat) => {
            error!("Med42 chat connection error: {e}");
            GatewayResult::error("Unable to connect to AI service")
        }
        (GatewayError::UpstreamConnection(e), Med42Job) => {
            error!("Med42 analyze connection error: {e}");
            GatewayResult::error("Unable to connect to medical AI service")
        }
        (GatewayError::UpstreamProtocol { status, body }, DirectChat) => {
            error!("Chat API error: {status} - {body}");
            GatewayResult::error("Failed to get AI response")
        }
        (GatewayError::UpstreamProtocol { status, body }, Med42Job) => {
            error!("Analyze API error: {status} - {body}");
            GatewayResult::error("Failed to trigger analysis")
                .with_details(truncate_chars(&body, 200))
        }
        (other, DirectChat) => {
            error!("Direct chat error: {other}");
            GatewayResult::error("Chat processing error")
        }
        (other, Med42Job) => {
            error!("Error triggering analysis: {other}");
            GatewayResult::error("Internal server error")
        }
    }
}

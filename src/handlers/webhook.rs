use crate::{
    AppState,
    handlers::WebhookError,
    models::webhook::{AckResult, AckStatus, EventKind, WebhookEvent},
    utils::truncate_chars,
};
use serde_json::Value;
use tracing::{info, warn};

/// Decodes and acknowledges one Med42 notification.
pub async fn receive(state: &AppState, payload: Option<Value>) -> Result<AckResult, WebhookError> {
    let payload = match payload {
        Some(v) if !is_empty(&v) => v,
        _ => return Err(WebhookError::MissingPayload),
    };
    if !payload.is_object() {
        return Err(WebhookError::Malformed(format!(
            "expected a JSON object, got {payload}"
        )));
    }
    info!("Received webhook: {payload}");

    let event: WebhookEvent =
        serde_json::from_value(payload).map_err(|e| WebhookError::Malformed(e.to_string()))?;

    if let Some(job_id) = &event.job_id {
        // Downstream processing hooks in here once results need to reach the user
        match state.jobs.lookup(job_id).await {
            Some(job) => info!(
                "Webhook for known job {job_id} (metadata={}, callback={})",
                job.metadata, job.webhook_url
            ),
            None => info!("Webhook for untracked job {job_id}"),
        }
    }

    Ok(acknowledge(&event))
}

/// Pure classification of an event into its acknowledgement.
pub fn acknowledge(event: &WebhookEvent) -> AckResult {
    let job_id = event.job_id.clone();
    match event.kind() {
        EventKind::AnalysisComplete => analysis_complete(event),
        EventKind::Error => {
            let details = event.error_text();
            warn!("Error for job {job_id:?}: {details}");
            AckResult {
                error_details: Some(truncate_chars(&details, 100)),
                ..AckResult::new(AckStatus::Error)
                    .message("Analysis failed")
                    .job_id(job_id)
                    .with_fallback()
            }
        }
        EventKind::Missing => {
            warn!("Missing event_type in webhook payload");
            AckResult::new(AckStatus::Handled)
                .error("Missing event_type in payload")
                .job_id(job_id)
                .with_fallback()
        }
        EventKind::Unknown => {
            info!(
                "Unknown webhook event_type {:?} acknowledged",
                event.event_type.as_deref().unwrap_or_default()
            );
            AckResult::new(AckStatus::Handled)
                .message("Unknown event type processed")
                .job_id(job_id)
        }
    }
}

fn analysis_complete(event: &WebhookEvent) -> AckResult {
    let job_id = event.job_id.clone();
    let results = event.results.as_ref().unwrap_or(&Value::Null);

    if is_empty(results) {
        warn!("Empty results for job {job_id:?}");
        return AckResult::new(AckStatus::Warning)
            .message("Analysis completed but no results available")
            .job_id(job_id)
            .with_fallback();
    }

    if let Value::Object(map) = results {
        let text = map.get("text").and_then(Value::as_str).unwrap_or_default();
        if text.trim().is_empty() {
            warn!("No text content in results for job {job_id:?}");
            return AckResult::new(AckStatus::Warning)
                .message("Analysis completed but no meaningful response")
                .job_id(job_id)
                .with_fallback();
        }
    }

    info!("Analysis complete for job {job_id:?}");
    AckResult {
        has_results: Some(true),
        ..AckResult::new(AckStatus::Success)
            .message("Analysis results processed successfully")
            .job_id(job_id)
    }
}

// JSON falsiness: null, false, 0, "", [] and {}
fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(v: Value) -> WebhookEvent {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn blank_text_is_a_warning() {
        let ack = acknowledge(&event(json!({
            "event_type": "analysis_complete",
            "job_id": "j1",
            "results": { "text": "   " }
        })));
        assert_eq!(ack.status, AckStatus::Warning);
        assert_eq!(ack.job_id.as_deref(), Some("j1"));
        assert!(ack.fallback_message.is_some());
    }

    #[test]
    fn missing_results_is_a_warning() {
        for results in [json!(null), json!({}), json!([]), json!(""), json!(0)] {
            let ack = acknowledge(&event(json!({
                "event_type": "analysis_complete",
                "job_id": "j1",
                "results": results
            })));
            assert_eq!(ack.status, AckStatus::Warning);
            assert_eq!(
                ack.message.as_deref(),
                Some("Analysis completed but no results available")
            );
        }
    }

    #[test]
    fn non_string_text_is_a_warning() {
        let ack = acknowledge(&event(json!({
            "event_type": "analysis_complete",
            "results": { "text": 5 }
        })));
        assert_eq!(ack.status, AckStatus::Warning);
    }

    #[test]
    fn non_object_results_count_as_content() {
        let ack = acknowledge(&event(json!({
            "event_type": "analysis_complete",
            "job_id": "j9",
            "results": ["finding"]
        })));
        assert_eq!(ack.status, AckStatus::Success);
        assert_eq!(ack.has_results, Some(true));
    }

    #[test]
    fn error_details_are_truncated() {
        let long = "x".repeat(250);
        let ack = acknowledge(&event(json!({
            "event_type": "error",
            "job_id": "j2",
            "error": long
        })));
        assert_eq!(ack.status, AckStatus::Error);
        assert_eq!(ack.error_details.unwrap().chars().count(), 100);
    }

    #[test]
    fn unknown_event_is_handled() {
        let ack = acknowledge(&event(json!({ "event_type": "progress", "job_id": "j3" })));
        assert_eq!(ack.status, AckStatus::Handled);
        assert_eq!(ack.message.as_deref(), Some("Unknown event type processed"));
    }

    #[test]
    fn same_event_same_ack() {
        let ev = event(json!({
            "event_type": "analysis_complete",
            "job_id": "j1",
            "results": { "text": "Likely viral." }
        }));
        assert_eq!(acknowledge(&ev), acknowledge(&ev));
    }
}

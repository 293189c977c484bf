use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::common::FALLBACK_MESSAGE;

/// Body accepted by `POST /analyze`.
///
/// The legacy front-end posts `message` instead of `text` and adds fields such
/// as `user_id` and `timestamp`; those extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    #[serde(default, alias = "message")]
    pub text: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Opaque, forwarded to Med42 as-is; `{}` only when the field is absent
    #[serde(default = "empty_metadata")]
    #[schema(value_type = Object)]
    pub metadata: Value,
    #[serde(default)]
    pub direct_response: Option<bool>,
    /// Explicit mode; when absent the mode is inferred from
    /// `direct_response` and `webhook_url`
    #[serde(default)]
    pub mode: Option<RequestedMode>,
    #[serde(default)]
    pub language: Option<String>,
}

fn empty_metadata() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestedMode {
    Direct,
    Job,
}

/// How a request is relayed to Med42. Serialized as the `type` field of the
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DispatchMode {
    #[serde(rename = "direct_chat")]
    DirectChat,
    #[serde(rename = "med42_job")]
    Med42Job,
}

impl AnalysisRequest {
    /// A caller-supplied, non-empty webhook URL.
    pub fn explicit_webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        match self.mode {
            Some(RequestedMode::Direct) => DispatchMode::DirectChat,
            Some(RequestedMode::Job) => DispatchMode::Med42Job,
            None => {
                let direct = self.direct_response.unwrap_or(false);
                if direct || self.explicit_webhook_url().is_none() {
                    DispatchMode::DirectChat
                } else {
                    DispatchMode::Med42Job
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Success,
    Warning,
    Error,
}

/// Body returned by `POST /analyze` with HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GatewayResult {
    pub status: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mode: Option<DispatchMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl GatewayResult {
    fn bare(status: ResultStatus) -> Self {
        Self {
            status,
            message: None,
            response: None,
            job_id: None,
            mode: None,
            fallback_message: None,
            details: None,
        }
    }

    pub fn chat_answer(response: String) -> Self {
        Self {
            response: Some(response),
            mode: Some(DispatchMode::DirectChat),
            ..Self::bare(ResultStatus::Success)
        }
    }

    pub fn job_started(job_id: String) -> Self {
        Self {
            message: Some("Analysis triggered successfully".to_string()),
            job_id: Some(job_id),
            mode: Some(DispatchMode::Med42Job),
            ..Self::bare(ResultStatus::Success)
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            fallback_message: Some(FALLBACK_MESSAGE.to_string()),
            ..Self::bare(ResultStatus::Warning)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            fallback_message: Some(FALLBACK_MESSAGE.to_string()),
            ..Self::bare(ResultStatus::Error)
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> AnalysisRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn no_webhook_url_selects_direct_chat() {
        let req = request(json!({ "text": "headache" }));
        assert_eq!(req.dispatch_mode(), DispatchMode::DirectChat);
    }

    #[test]
    fn webhook_url_without_flag_selects_job() {
        let req = request(json!({ "text": "x", "webhook_url": "https://cb.example/hook" }));
        assert_eq!(req.dispatch_mode(), DispatchMode::Med42Job);
    }

    #[test]
    fn direct_flag_beats_webhook_url() {
        let req = request(json!({
            "text": "x",
            "webhook_url": "https://cb.example/hook",
            "direct_response": true
        }));
        assert_eq!(req.dispatch_mode(), DispatchMode::DirectChat);
    }

    #[test]
    fn empty_webhook_url_counts_as_absent() {
        let req = request(json!({ "text": "x", "webhook_url": "" }));
        assert_eq!(req.dispatch_mode(), DispatchMode::DirectChat);
    }

    #[test]
    fn explicit_mode_overrides_inference() {
        let req = request(json!({ "text": "x", "mode": "job" }));
        assert_eq!(req.dispatch_mode(), DispatchMode::Med42Job);

        let req = request(json!({
            "text": "x",
            "mode": "direct",
            "webhook_url": "https://cb.example/hook"
        }));
        assert_eq!(req.dispatch_mode(), DispatchMode::DirectChat);
    }

    #[test]
    fn legacy_message_field_is_accepted_as_text() {
        let req = request(json!({
            "message": "fever",
            "language": "Hindi",
            "user_id": "u1",
            "timestamp": "2024-01-01T00:00:00"
        }));
        assert_eq!(req.text.as_deref(), Some("fever"));
        assert_eq!(req.language.as_deref(), Some("Hindi"));
    }

    #[test]
    fn metadata_defaults_only_when_absent() {
        assert_eq!(request(json!({ "text": "x" })).metadata, json!({}));
        assert_eq!(request(json!({ "text": "x", "metadata": null })).metadata, Value::Null);
        assert_eq!(
            request(json!({ "text": "x", "metadata": ["a", 1] })).metadata,
            json!(["a", 1])
        );
    }

    #[test]
    fn chat_answer_serializes_without_empty_fields() {
        let body = serde_json::to_value(GatewayResult::chat_answer("Rest.".into())).unwrap();
        assert_eq!(
            body,
            json!({ "status": "success", "response": "Rest.", "type": "direct_chat" })
        );
    }

    #[test]
    fn error_carries_fallback_message() {
        let body = serde_json::to_value(GatewayResult::error("AI response timeout")).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["fallback_message"], FALLBACK_MESSAGE);
        assert!(body.get("type").is_none());
    }
}

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use utoipa::ToSchema;

use super::{common::FALLBACK_MESSAGE, med42::job_id_text};

/// A Med42 job notification as posted to `/webhook`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_job_id")]
    pub job_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub results: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub error: Option<Value>,
}

// Same rule as the analyze reply, so ids issued as numbers still correlate
fn lenient_job_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(v @ (Value::String(_) | Value::Number(_))) => Ok(job_id_text(&v)),
        Some(other) => Err(D::Error::custom(format!(
            "job_id must be a string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    AnalysisComplete,
    Error,
    Unknown,
    Missing,
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_deref() {
            Some("analysis_complete") => EventKind::AnalysisComplete,
            Some("error") => EventKind::Error,
            Some("") | None => EventKind::Missing,
            Some(_) => EventKind::Unknown,
        }
    }

    /// The error text carried by an `error` event.
    pub fn error_text(&self) -> String {
        match &self.error {
            None | Some(Value::Null) => "Unknown error".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Success,
    Warning,
    Error,
    Handled,
    Rejected,
}

/// Body returned by `POST /webhook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AckResult {
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,
}

impl AckResult {
    pub fn new(status: AckStatus) -> Self {
        Self {
            status,
            message: None,
            job_id: None,
            has_results: None,
            error: None,
            error_details: None,
            fallback_message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn job_id(mut self, job_id: Option<String>) -> Self {
        self.job_id = job_id;
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_fallback(mut self) -> Self {
        self.fallback_message = Some(FALLBACK_MESSAGE.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_event_types() {
        let ev = |t: Option<&str>| WebhookEvent {
            event_type: t.map(str::to_string),
            ..Default::default()
        };
        assert_eq!(ev(Some("analysis_complete")).kind(), EventKind::AnalysisComplete);
        assert_eq!(ev(Some("error")).kind(), EventKind::Error);
        assert_eq!(ev(Some("progress")).kind(), EventKind::Unknown);
        assert_eq!(ev(Some("")).kind(), EventKind::Missing);
        assert_eq!(ev(None).kind(), EventKind::Missing);
    }

    #[test]
    fn error_text_defaults_and_stringifies() {
        let mut ev = WebhookEvent::default();
        assert_eq!(ev.error_text(), "Unknown error");
        ev.error = Some(json!("timeout"));
        assert_eq!(ev.error_text(), "timeout");
        ev.error = Some(json!({ "code": 5 }));
        assert_eq!(ev.error_text(), r#"{"code":5}"#);
    }

    #[test]
    fn numeric_job_id_decodes_as_string() {
        let ev: WebhookEvent = serde_json::from_value(json!({
            "event_type": "error",
            "job_id": 991
        }))
        .unwrap();
        assert_eq!(ev.job_id.as_deref(), Some("991"));

        let ev: WebhookEvent = serde_json::from_value(json!({ "job_id": null })).unwrap();
        assert_eq!(ev.job_id, None);
    }

    #[test]
    fn structured_job_id_does_not_decode() {
        let parsed = serde_json::from_value::<WebhookEvent>(json!({
            "event_type": "error",
            "job_id": { "id": 1 }
        }));
        assert!(parsed.is_err());
    }
}

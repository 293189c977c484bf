use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Body sent to `POST {MED42_API_URL}/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatPayload {
    pub text: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
}

/// Body sent to `POST {MED42_API_URL}/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzePayload {
    pub text: String,
    pub webhook_url: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
}

/// Med42 replies are read loosely: only a couple of fields matter and their
/// shape has varied between API revisions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Med42Reply(pub Map<String, Value>);

impl Med42Reply {
    /// The chat answer. `response` wins whenever the key is present, even if
    /// empty; `text` is only consulted when `response` is missing.
    pub fn answer(&self) -> Option<&str> {
        let field = self.0.get("response").or_else(|| self.0.get("text"))?;
        field.as_str().filter(|s| !s.is_empty())
    }

    /// The job identifier issued for an analysis. Numeric ids are accepted
    /// and rendered as strings.
    pub fn job_id(&self) -> Option<String> {
        job_id_text(self.0.get("job_id")?)
    }
}

/// Med42 job ids arrive as strings or numbers; both are kept as strings.
pub fn job_id_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

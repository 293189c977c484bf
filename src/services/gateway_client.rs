//! Client side of the chat front-end contract: post a question to the
//! gateway's `/analyze` route and turn whatever comes back into text a chat
//! window can render.

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::models::chat::{ChatSession, FrontendQuery};

const NO_ANSWER: &str = "No response received.";

#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    analyze_url: Url,
}

impl GatewayClient {
    pub fn new(http: reqwest::Client, analyze_url: Url) -> Self {
        Self { http, analyze_url }
    }

    /// Never fails: transport problems and non-2xx replies are rendered as
    /// an `Error: ...` line instead.
    pub async fn ask(&self, text: &str, language: &str) -> String {
        let query = FrontendQuery {
            text: text.to_string(),
            language: language.to_string(),
        };

        let res = match self
            .http
            .post(self.analyze_url.clone())
            .json(&query)
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => return format!("Error: {err}"),
        };

        let status = res.status();
        let body = res
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());

        if !status.is_success() {
            return format!("Error: {} - {}", status.as_u16(), body);
        }

        debug!("gateway replied: {body}");
        render_reply(&body)
    }

    /// Appends the user turn, asks the gateway, appends and returns the
    /// assistant turn.
    pub async fn exchange(&self, session: &mut ChatSession, text: &str, language: &str) -> String {
        session.push_user(text);
        let reply = self.ask(text, language).await;
        session.push_assistant(reply.clone());
        reply
    }
}

fn render_reply(body: &str) -> String {
    let Ok(v) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    ["response", "fallback_message"]
        .iter()
        .filter_map(|k| v.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or(NO_ANSWER)
        .to_string()
}

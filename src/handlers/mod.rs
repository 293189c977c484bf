use crate::services::med42::Med42Error;
use thiserror::Error;

pub mod dispatch;
pub mod webhook;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Text field is required")]
    Validation,

    #[error("upstream timeout")]
    UpstreamTimeout,

    #[error("upstream connection error: {0}")]
    UpstreamConnection(String),

    // Anything but a 200 from Med42
    #[error("upstream status {status}: {body}")]
    UpstreamProtocol { status: u16, body: String },

    #[error("upstream returned no usable content")]
    UpstreamEmptyResult,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<Med42Error> for GatewayError {
    fn from(err: Med42Error) -> Self {
        match err {
            Med42Error::Timeout => GatewayError::UpstreamTimeout,
            Med42Error::Connection(e) => GatewayError::UpstreamConnection(e),
            Med42Error::Status { status, body } => GatewayError::UpstreamProtocol {
                status: status.as_u16(),
                body,
            },
            Med42Error::Decode(e) | Med42Error::Request(e) => GatewayError::Internal(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("No JSON payload received")]
    MissingPayload,

    #[error("malformed webhook payload: {0}")]
    Malformed(String),
}

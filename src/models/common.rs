// src/models/common.rs
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shown to the user whenever no real AI answer is available.
pub const FALLBACK_MESSAGE: &str = "Sorry, I couldn't get a medical response at this time. Please try again later or consult with a healthcare professional.";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    pub error: String,
    pub fallback_message: String,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fallback_message: FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Med42 Gateway",
        version = "0.1.0",
        description = "Chat front-end → Med42 relay. Answers questions inline or starts Med42 analysis jobs, and acknowledges Med42 webhooks."
    ),
    servers(
        (url = "http://localhost:5000", description = "Local dev")
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "gateway", description = "Question dispatch to Med42"),
        (name = "webhooks", description = "Med42 job notifications")
    ),
    // Handlers (paths)
    paths(
        crate::routes::health::health_check,
        crate::routes::analyze::analyze,
        crate::routes::webhook::receive_webhook,
    ),
    // Schemas used in requests/responses
    components(
        schemas(
            crate::models::analysis::AnalysisRequest,
            crate::models::analysis::RequestedMode,
            crate::models::analysis::DispatchMode,
            crate::models::analysis::ResultStatus,
            crate::models::analysis::GatewayResult,
            crate::models::med42::ChatPayload,
            crate::models::med42::AnalyzePayload,
            crate::models::webhook::WebhookEvent,
            crate::models::webhook::AckStatus,
            crate::models::webhook::AckResult,
            crate::models::common::ErrorMessage,
            crate::models::common::HealthStatus
        )
    )
)]
pub struct ApiDoc;

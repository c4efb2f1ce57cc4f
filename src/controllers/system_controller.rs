use axum::{extract::State, Json};

use crate::config::Config;
use crate::models::system::HealthStatus;
use crate::shared_state::AppState;

/// GET /api/health
/// Service liveness and counters
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<AppState>, State(config): State<Config>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        quotations_generated: state.quotations_generated(),
        quotations_rejected: state.quotations_rejected(),
        chat_messages_answered: state.chat_messages(),
        chat_enabled: config.chat.enabled,
    })
}

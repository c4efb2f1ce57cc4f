use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::config::Config;
use crate::controllers::pace;
use crate::errors::{ErrorBody, QuotationError};
use crate::models::chat::{ChatReply, ChatRequest};
use crate::services::chat_responder;
use crate::shared_state::AppState;

/// POST /api/chat
/// Ask the site assistant a question
///
/// Answers from a fixed set of topics matched by keyword. Returns `503`
/// when the assistant is disabled in the configuration.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Canned answer", body = ChatReply),
        (status = 400, description = "Empty or malformed message", body = ErrorBody),
        (status = 503, description = "Assistant disabled", body = ErrorBody)
    )
)]
pub async fn post_chat_message(
    State(state): State<AppState>,
    State(config): State<Config>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    if !config.chat.enabled {
        let body = ErrorBody {
            kind: "Unavailable".to_string(),
            message: "Chat assistant is disabled".to_string(),
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }

    let reply = payload
        .map_err(|rejection| QuotationError::invalid(rejection.body_text()))
        .and_then(|Json(req)| chat_responder::respond(&req.message));

    match reply {
        Ok(reply) => {
            pace(config.chat.response_delay_ms).await;
            state.record_chat();
            debug!(topic = %reply.topic, "chat answered");
            Json(reply).into_response()
        }
        Err(e) => e.into_response(),
    }
}

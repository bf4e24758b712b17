//! Axum route handlers for reply generation.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::replies::generator::{generate_reply, GeneratedReply};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub profile_id: i32,
    pub message_id: String,
}

/// POST /message/get_response
///
/// Generates a reply to review `message_id` using profile `profile_id`.
/// `persisted` in the response reports whether the reply was saved; clients
/// that need confirmation can poll GET /reviews/:review_id.
pub async fn handle_get_response(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<GeneratedReply>, AppError> {
    let reply = generate_reply(
        state.store.as_ref(),
        state.llm.as_ref(),
        request.profile_id,
        &request.message_id,
    )
    .await?;

    Ok(Json(reply))
}

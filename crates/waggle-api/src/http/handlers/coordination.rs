//! Claim-cycle handlers: registration, response checks, completion.
//!
//! Request fields are deserialized as `Option` so that a body which parses
//! but lacks a required field gets the distinct "Missing required fields"
//! response rather than a generic JSON error.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use waggle_types::bot::BotRegistration;
use waggle_types::decision::Priority;

use crate::http::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub chat_id: Option<String>,
    pub message_id: Option<String>,
    pub bot_id: Option<String>,
    pub message_text: Option<String>,
    pub is_mention: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub should_respond: bool,
    pub reason: String,
    pub priority: Priority,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub bot_id: Option<String>,
    pub chat_id: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub bot_id: Option<String>,
    pub bot_name: Option<String>,
    pub weight: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

/// POST /check - Ask whether `bot_id` may respond to a message.
///
/// A granted check claims the message for the bot; a denial reports why.
/// The response always carries the message's classified priority, even
/// when the check is refused before classification happens.
pub async fn check(
    State(state): State<AppState>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(chat_id), Some(message_id), Some(bot_id)) =
        (body.chat_id, body.message_id, body.bot_id)
    else {
        return Err(ApiError::MissingFields);
    };
    let message_text = body.message_text.unwrap_or_default();
    let is_mention = body.is_mention.unwrap_or(false);

    let decision = state
        .coordinator
        .should_respond(&chat_id, &message_id, &bot_id, &message_text, is_mention)
        .await?;
    let priority = decision
        .priority
        .unwrap_or_else(|| state.coordinator.classify_priority(&message_text, is_mention));

    Ok(Json(CheckResponse {
        should_respond: decision.respond,
        reason: decision.reason.to_string(),
        priority,
    }))
}

/// POST /complete - Record that `bot_id` finished responding to a message.
pub async fn complete(
    State(state): State<AppState>,
    body: Result<Json<CompleteRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(bot_id), Some(chat_id), Some(message_id)) =
        (body.bot_id, body.chat_id, body.message_id)
    else {
        return Err(ApiError::MissingFields);
    };

    state
        .coordinator
        .complete_response(&bot_id, &chat_id, &message_id, None)
        .await?;

    Ok(Json(AckResponse { success: true }))
}

/// POST /register - Register a bot, idempotent by id.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(bot_id), Some(bot_name)) = (body.bot_id, body.bot_name) else {
        return Err(ApiError::MissingFields);
    };

    state
        .coordinator
        .register_bot(BotRegistration {
            id: bot_id,
            name: bot_name,
            weight: body.weight,
        })
        .await?;

    Ok(Json(AckResponse { success: true }))
}

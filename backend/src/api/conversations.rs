//! Conversation and message endpoints

use super::extract::{JsonBody, OptionalJsonBody, PathParam};
use crate::app::AppState;
use crate::database::{CreateConversationRequest, CreateMessageRequest};
use crate::error::Result;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// List conversations by last activity
pub async fn list_conversations(State(state): State<AppState>) -> Result<Json<Value>> {
    let conversations = state.conversations_service.list_conversations().await?;
    Ok(Json(json!({ "conversations": conversations })))
}

/// Start a conversation; the body, and with it the title, is optional
pub async fn create_conversation(
    State(state): State<AppState>,
    OptionalJsonBody(req): OptionalJsonBody<CreateConversationRequest>,
) -> Result<Json<Value>> {
    let conversation = state.conversations_service.create_conversation(req).await?;
    Ok(Json(json!({ "success": true, "conversation": conversation })))
}

/// A conversation with all of its messages
pub async fn get_messages(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    let thread = state.conversations_service.get_thread(id).await?;
    Ok(Json(json!(thread)))
}

/// Append a message to a conversation
pub async fn add_message(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<CreateMessageRequest>,
) -> Result<Json<Value>> {
    let (message, conversation) = state.conversations_service.add_message(id, req).await?;
    Ok(Json(json!({
        "success": true,
        "message": message,
        "conversation": conversation,
    })))
}

/// Delete a conversation and its messages
pub async fn delete_conversation(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    state.conversations_service.delete_conversation(id).await?;
    Ok(Json(json!({ "success": true })))
}

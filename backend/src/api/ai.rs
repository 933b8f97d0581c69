//! AI configuration and chat proxy endpoints

use super::extract::JsonBody;
use crate::app::AppState;
use crate::database::SaveAiConfigRequest;
use crate::error::Result;
use crate::services::ChatRequest;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// Stored configuration, `null` when none was saved yet
pub async fn get_config(State(state): State<AppState>) -> Result<Json<Value>> {
    let config = state.ai_config_service.get_config().await?;
    Ok(Json(json!({ "config": config })))
}

pub async fn save_config(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveAiConfigRequest>,
) -> Result<Json<Value>> {
    let config = state.ai_config_service.save_config(req).await?;
    Ok(Json(json!({ "success": true, "config": config })))
}

/// Forward a chat to the AI provider and return its reply
pub async fn call_qwen(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<Value>> {
    let response = state.chat_proxy.complete(req).await?;
    Ok(Json(json!({ "success": true, "response": response })))
}

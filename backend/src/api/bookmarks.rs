//! Bookmark endpoints

use super::extract::{JsonBody, PathParam};
use crate::app::AppState;
use crate::database::CreateBookmarkRequest;
use crate::error::Result;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Json<Value>> {
    let bookmarks = state.bookmarks_service.list_bookmarks().await?;
    Ok(Json(json!({ "bookmarks": bookmarks })))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateBookmarkRequest>,
) -> Result<Json<Value>> {
    let bookmark = state.bookmarks_service.create_bookmark(req).await?;
    Ok(Json(json!({ "success": true, "bookmark": bookmark })))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    state.bookmarks_service.delete_bookmark(id).await?;
    Ok(Json(json!({ "success": true })))
}

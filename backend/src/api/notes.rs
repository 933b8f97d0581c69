//! Note endpoints
//!
//! CRUD operations for notes.

use super::extract::{JsonBody, PathParam};
use crate::app::AppState;
use crate::database::{CreateNoteRequest, UpdateNoteRequest};
use crate::error::Result;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// List all notes
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Value>> {
    let notes = state.notes_service.list_notes().await?;
    Ok(Json(json!({ "notes": notes })))
}

/// Get a note by ID
pub async fn get_note(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Value>> {
    let note = state.notes_service.get_note(&id).await?;
    Ok(Json(json!({ "note": note })))
}

/// Create a new note
pub async fn create_note(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateNoteRequest>,
) -> Result<Json<Value>> {
    let note = state.notes_service.create_note(req).await?;
    Ok(Json(json!({ "success": true, "note": note })))
}

/// Update a note
pub async fn update_note(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
    JsonBody(req): JsonBody<UpdateNoteRequest>,
) -> Result<Json<Value>> {
    let note = state.notes_service.update_note(&id, req).await?;
    Ok(Json(json!({ "success": true, "note": note })))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Json<Value>> {
    state.notes_service.delete_note(&id).await?;
    Ok(Json(json!({ "success": true })))
}

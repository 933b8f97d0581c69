//! Document endpoints

use super::extract::{PathParam, UploadForm};
use super::file_response;
use crate::app::AppState;
use crate::error::Result;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

/// Upload a PDF or TXT document (`file`, `title`, optional `encoding`)
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;

    let book = state
        .documents_service
        .upload(file, form.text("title"), form.text("encoding"))
        .await?;

    Ok(Json(json!({ "success": true, "book": book })))
}

/// List documents, newest first
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Value>> {
    let books = state.documents_service.list_documents().await?;
    Ok(Json(json!({ "books": books })))
}

/// Download the backing file of a document
pub async fn get_document(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Response> {
    let (document, data) = state.documents_service.read_document(id).await?;
    Ok(file_response(&document.file_name, data))
}

pub async fn delete_document(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    state.documents_service.delete_document(id).await?;
    Ok(Json(json!({ "success": true })))
}

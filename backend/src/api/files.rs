//! Static serving of the upload tree and image uploads

use super::extract::{PathParam, UploadForm};
use super::file_response;
use crate::app::AppState;
use crate::error::Result;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

/// Store an image for embedding in notes
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let mut form = UploadForm::read(multipart).await?;
    let image_url = state.images_service.upload(form.take_file()?).await?;

    Ok(Json(json!({ "success": true, "image_url": image_url })))
}

/// Serve a file from below the upload root
pub async fn serve_upload(
    State(state): State<AppState>,
    PathParam(path): PathParam<String>,
) -> Result<Response> {
    let full = state.store.resolve(&path).await?;
    let data = tokio::fs::read(&full).await?;

    tracing::debug!("Serving upload: {}", path);
    Ok(file_response(&path, data))
}

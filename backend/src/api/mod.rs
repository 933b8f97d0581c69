//! HTTP API exposed to the frontend
//!
//! This module organizes handlers into logical submodules:
//! - `documents`: PDF/TXT upload, listing, download and delete
//! - `games`: game upload, listing, download and delete
//! - `files`: image upload and serving of the upload tree
//! - `bookmarks`, `notes`, `work_records`: plain CRUD
//! - `conversations`: chat threads and their messages
//! - `ai`: AI configuration and the chat completion proxy
//!
//! Handlers are thin wrappers around the services in `AppState`.

pub mod ai;
pub mod auth;
pub mod bookmarks;
pub mod conversations;
pub mod documents;
pub mod extract;
pub mod files;
pub mod games;
pub mod notes;
pub mod work_records;

use crate::app::AppState;
use crate::storage::upload_store::content_type_for;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    let api = Router::new()
        // Documents
        .route("/api/upload-pdf", post(documents::upload_document))
        .route("/api/get-pdfs", get(documents::list_documents))
        .route("/api/get-pdf/:id", get(documents::get_document))
        .route("/api/delete-pdf/:id", delete(documents::delete_document))
        // Bookmarks
        .route(
            "/api/bookmarks",
            get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark),
        )
        .route("/api/bookmarks/:id", delete(bookmarks::delete_bookmark))
        // Conversations
        .route(
            "/api/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/api/conversations/:id",
            delete(conversations::delete_conversation),
        )
        .route(
            "/api/conversations/:id/messages",
            get(conversations::get_messages).post(conversations::add_message),
        )
        // Notes
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/api/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        // Work records
        .route(
            "/api/work-records",
            get(work_records::list_records).post(work_records::create_record),
        )
        .route("/api/work-records/:id", delete(work_records::delete_record))
        // Games
        .route("/api/upload-game", post(games::upload_game))
        .route("/api/get-games", get(games::list_games))
        .route("/api/get-game/:id", get(games::get_game))
        .route("/api/delete-game/:id", delete(games::delete_game))
        // Images
        .route("/api/upload-image", post(files::upload_image))
        // AI
        .route("/api/ai-config", get(ai::get_config).post(ai::save_config))
        .route("/api/call-qwen", post(ai::call_qwen))
        .route("/api/chat", post(ai::call_qwen))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    api.route("/api/health", get(health))
        .route("/uploads/*path", get(files::serve_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe, never behind auth
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Raw file body with a content type derived from the file name
pub(crate) fn file_response(file_name: &str, data: Vec<u8>) -> Response {
    ([(CONTENT_TYPE, content_type_for(file_name))], data).into_response()
}

//! Game endpoints

use super::extract::{PathParam, UploadForm};
use super::file_response;
use crate::app::AppState;
use crate::error::Result;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

/// Upload a game (`file`, `name`, optional `game_type`)
pub async fn upload_game(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;

    let game = state
        .games_service
        .upload(file, form.text("name"), form.text("game_type"))
        .await?;

    Ok(Json(json!({ "success": true, "game": game })))
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Value>> {
    let games = state.games_service.list_games().await?;
    Ok(Json(json!({ "games": games })))
}

pub async fn get_game(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Response> {
    let (game, data) = state.games_service.read_game(id).await?;
    Ok(file_response(&game.file_name, data))
}

pub async fn delete_game(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    state.games_service.delete_game(id).await?;
    Ok(Json(json!({ "success": true })))
}

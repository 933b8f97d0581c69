//! Work record endpoints
//!
//! Dates and times are validated by the service, not here.

use super::extract::{JsonBody, PathParam};
use crate::app::AppState;
use crate::database::CreateWorkRecordRequest;
use crate::error::Result;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn list_records(State(state): State<AppState>) -> Result<Json<Value>> {
    let records = state.work_records_service.list_records().await?;
    Ok(Json(json!({ "records": records })))
}

pub async fn create_record(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateWorkRecordRequest>,
) -> Result<Json<Value>> {
    let record = state.work_records_service.create_record(req).await?;
    Ok(Json(json!({ "success": true, "record": record })))
}

pub async fn delete_record(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Value>> {
    state.work_records_service.delete_record(id).await?;
    Ok(Json(json!({ "success": true })))
}

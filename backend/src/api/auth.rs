//! Optional bearer token gate for `/api` routes

use crate::app::AppState;
use crate::error::{AppError, Result};
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

/// Reject requests without a non-empty bearer token when auth is enabled.
/// The token itself is not verified.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !state.config.require_auth {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "Missing or invalid Authorization header".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

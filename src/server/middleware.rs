use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use super::AppState;
use crate::error::AppError;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// API Key authentication middleware
/// Validates X-API-Key header against configured api.key
pub async fn api_key_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // No key configured: every request passes (development mode)
    let Some(expected_key) = &state.settings.api.key else {
        return Ok(next.run(req).await);
    };

    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match api_key {
        Some(key) if key == expected_key => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "Invalid API key provided");
            Err(AppError::Auth("Invalid API key".to_string()))
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "Missing API key header");
            Err(AppError::Auth(format!("Missing {} header", API_KEY_HEADER)))
        }
    }
}

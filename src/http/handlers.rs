use super::state::AppState;
use crate::credential::{ApiKeyResponse, ErrorResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

/// GET /api/get-key
/// Hand the configured API key to the client
pub async fn get_key(State(state): State<AppState>) -> impl IntoResponse {
    match state.secret.resolve() {
        Ok(api_key) => {
            info!("Serving API key");
            (StatusCode::OK, Json(ApiKeyResponse { api_key })).into_response()
        }
        Err(e) => {
            error!("API key requested but unavailable: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

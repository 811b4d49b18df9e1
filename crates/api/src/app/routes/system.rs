use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::errors::ApiError;
use crate::context::CallerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /whoami - the verified claims of the caller
pub async fn whoami(Extension(caller): Extension<CallerContext>) -> impl IntoResponse {
    let claims = caller.claims();
    Json(serde_json::json!({
        "user_id": caller.user_id().to_string(),
        "email": claims.email,
        "role": caller.role().as_str(),
        "expires_at": claims.expires_at.to_rfc3339(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn not_implemented() -> ApiError {
    ApiError::NotImplemented
}

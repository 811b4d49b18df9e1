use axum::{
    extract::{State, rejection::JsonRejection},
    Json,
};
use chrono::Utc;

use tenantgate_auth::CredentialValidator;

use crate::app::dto::{TokenRequest, TokenResponse};
use crate::app::errors::ApiError;

/// POST /auth/token - exchange email/password for a signed token
pub async fn create_token(
    State(credentials): State<CredentialValidator>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    body.validate()?;

    let issued = credentials
        .issue_token(&body.email, &body.password, Utc::now())
        .await?;

    Ok(Json(TokenResponse { token: issued.token }))
}

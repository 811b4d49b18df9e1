use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use percent_encoding::percent_decode_str;

use tenantgate_auth::{Authorizer, JwtValidator};

use crate::app::errors::ApiError;
use crate::context::CallerContext;

/// Header carrying the token on every authenticated call.
pub const TOKEN_HEADER: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

#[derive(Clone)]
pub struct RbacState {
    pub authorizer: Authorizer,
}

/// Validate the presented token and attach the caller's claims to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or(ApiError::Unauthenticated)?;

    let claims = state.jwt.validate(token, Utc::now())?;

    req.extensions_mut().insert(CallerContext::new(claims));

    Ok(next.run(req).await)
}

/// Evaluate the rule set for the authenticated caller; only allowed requests
/// reach the handler.
pub async fn rbac_middleware(
    State(state): State<RbacState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<CallerContext>()
        .ok_or(ApiError::Unauthenticated)?;

    // Nested routers see a stripped URI; rules are written against the full path.
    let raw_path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path())
        .unwrap_or_else(|| req.uri().path());
    let path = decode_path(raw_path)?;

    let decision = state
        .authorizer
        .authorize(caller.claims(), &path, req.method().as_str())?;
    if !decision.allowed {
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// Rules match decoded paths, so `%40` in a request path is seen as `@`.
fn decode_path(raw: &str) -> Result<Cow<'_, str>, ApiError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| ApiError::BadRequest("malformed request path".to_string()))
}

/// The `Token` header, or an `Authorization: Bearer` credential as a fallback.
/// Empty values count as absent.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let token = match headers.get(TOKEN_HEADER) {
        Some(value) => value.to_str().ok()?,
        None => headers
            .get(axum::http::header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?,
    };

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

//! HTTP API application wiring (Axum router + pipeline wiring).
//!
//! - `routes/`: login, system endpoints, and the `/v1` placeholder surface
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: one terminal JSON error response per failure class

use std::sync::Arc;

use axum::{Router, routing::{get, post}};
use tower::ServiceBuilder;

use tenantgate_auth::{
    Authorizer, CredentialValidator, Hs256JwtIssuer, Hs256JwtValidator, IdentityStore, RuleSet,
    TokenConfig,
};

use crate::middleware::{self, AuthState, RbacState};

pub mod dto;
pub mod errors;
pub mod routes;

/// Process-wide, read-only pipeline components shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialValidator,
    pub auth: AuthState,
    pub rbac: RbacState,
}

impl AppState {
    pub fn new(token: &TokenConfig, identities: Arc<dyn IdentityStore>, rules: RuleSet) -> Self {
        let issuer = Arc::new(Hs256JwtIssuer::new(token));
        Self {
            credentials: CredentialValidator::new(identities, issuer),
            auth: AuthState {
                jwt: Arc::new(Hs256JwtValidator::new(token)),
            },
            rbac: RbacState {
                authorizer: Authorizer::new(Arc::new(rules)),
            },
        }
    }
}

/// Build the full HTTP router.
///
/// `downstream` holds the record handlers served under `/v1`; every one of its
/// routes runs behind token validation and the RBAC gate.
pub fn build_app(state: AppState, downstream: Router) -> Router {
    let authenticated = axum::middleware::from_fn_with_state(state.auth.clone(), middleware::auth_middleware);

    let protected = downstream.route_layer(
        ServiceBuilder::new()
            .layer(authenticated.clone())
            .layer(axum::middleware::from_fn_with_state(
                state.rbac.clone(),
                middleware::rbac_middleware,
            )),
    );

    // Authenticated but not rule-gated: callers may always inspect themselves.
    let identity = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .route_layer(authenticated);

    let login = Router::new()
        .route("/auth/token", post(routes::auth::create_token))
        .with_state(state.credentials);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(login)
        .merge(identity)
        .nest("/v1", protected)
        .fallback(routes::system::not_found)
}

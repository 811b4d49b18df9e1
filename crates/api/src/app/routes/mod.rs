use axum::{Router, routing::any};

pub mod auth;
pub mod system;

/// Stand-in for the record handlers (users, resources, quotas, catalog).
///
/// Routes mirror the downstream surface so the auth pipeline guards them;
/// every handler answers 501 until a real implementation is mounted.
pub fn placeholder_router() -> Router {
    Router::new()
        .route("/users", any(system::not_implemented))
        .route("/users/:id", any(system::not_implemented))
        .route("/resources/:uid", any(system::not_implemented))
        .route("/resources/:uid/:rid", any(system::not_implemented))
        .route("/quotas/:uid", any(system::not_implemented))
        .route("/quotas/:uid/:qid", any(system::not_implemented))
        .route("/catalog", any(system::not_implemented))
}

use tenantgate_auth::Claims;
use tenantgate_core::{Role, UserId};

/// Verified caller identity for a request.
///
/// Inserted by the token middleware after successful validation; handlers and
/// the RBAC gate read it as a typed request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    claims: Claims,
}

impl CallerContext {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn user_id(&self) -> UserId {
        self.claims.user_id
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }
}

//! Credential validation: email/password → signed token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use tenantgate_core::Identity;

use crate::token::{Hs256JwtIssuer, IssuedToken, TokenError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityStoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Identity-lookup collaborator. The only storage access the pipeline performs.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Resolve an identity by exact email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, IdentityStoreError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error(transparent)]
    Store(#[from] IdentityStoreError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl LoginError {
    /// Only `AuthenticationFailed` may be reported to the caller verbatim.
    pub fn is_internal(&self) -> bool {
        !matches!(self, LoginError::AuthenticationFailed)
    }
}

/// Validates credentials and issues tokens for the identities behind them.
#[derive(Clone)]
pub struct CredentialValidator {
    store: Arc<dyn IdentityStore>,
    issuer: Arc<Hs256JwtIssuer>,
}

impl CredentialValidator {
    pub fn new(store: Arc<dyn IdentityStore>, issuer: Arc<Hs256JwtIssuer>) -> Self {
        Self { store, issuer }
    }

    /// Resolve `email`, check `password`, and sign claims valid from `now`.
    pub async fn issue_token(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, LoginError> {
        let identity = self.validate_credentials(email, password).await?;
        let issued = self.issuer.issue(&identity, now)?;
        tracing::debug!(user_id = %identity.id, role = %identity.role, "token issued");
        Ok(issued)
    }

    async fn validate_credentials(&self, email: &str, password: &str) -> Result<Identity, LoginError> {
        match self.store.find_by_email(email).await? {
            Some(identity) if identity.password_matches(password) => Ok(identity),
            _ => Err(LoginError::AuthenticationFailed),
        }
    }
}

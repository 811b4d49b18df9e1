//! `tenantgate-auth` — claim-based access-control pipeline.
//!
//! Credential validation and token issuance, token validation, and the
//! rule-based authorization engine. This crate is intentionally decoupled
//! from HTTP and storage: identities are resolved through [`IdentityStore`].

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod matcher;
pub mod rules;
pub mod template;
pub mod token;

pub use authorize::{authorize, Authorizer, AuthzError, Decision, DecisionReason};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use credentials::{CredentialValidator, IdentityStore, IdentityStoreError, LoginError};
pub use matcher::{CompiledRule, RuleError};
pub use rules::{Rule, RuleSet, RuleSetError};
pub use template::TemplateError;
pub use token::{
    Hs256JwtIssuer, Hs256JwtValidator, IssuedToken, JwtValidator, SigningSecret, TokenConfig,
    TokenError,
};

//! Sample identities for development deployments.

use thiserror::Error;

use tenantgate_core::{Identity, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("duplicate identity email '{0}'")]
    DuplicateEmail(String),

    #[error("identity store lock poisoned")]
    Poisoned,
}

/// One regular user and one administrator, both with password `secret`.
pub fn sample_identities() -> Vec<Identity> {
    vec![
        Identity::new("joe@example.org", "secret", Role::User),
        Identity::new("admin@example.org", "secret", Role::Admin),
    ]
}

//! Infrastructure layer: identity-lookup collaborators and sample data.

pub mod identity;

pub use identity::{InMemoryIdentityStore, SeedError, sample_identities};

//! Identity stores backing credential validation.

pub mod in_memory;
pub mod seed;

pub use in_memory::InMemoryIdentityStore;
pub use seed::{SeedError, sample_identities};

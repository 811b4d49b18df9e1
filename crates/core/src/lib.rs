//! Identity primitives shared by the auth pipeline and its stores.

pub mod error;
pub mod id;
pub mod identity;
pub mod role;

pub use error::DomainError;
pub use id::UserId;
pub use identity::Identity;
pub use role::Role;

//! Process-wide structured logging for the tenantgate binaries.

pub mod tracing;

pub use self::tracing::init;

//! HTTP API: login, token validation, RBAC gate, and request/response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;

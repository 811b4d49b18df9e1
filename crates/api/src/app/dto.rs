//! Request/response DTOs for the login interface.

use serde::{Deserialize, Serialize};

use crate::app::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TokenRequest {
    /// Shape checks only; whether the credentials are right is the
    /// credential validator's business.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.is_empty() {
            return Err(ApiError::BadRequest("email is required".to_string()));
        }
        if !looks_like_email(&self.email) {
            return Err(ApiError::BadRequest("email is not a valid address".to_string()));
        }
        if self.password.is_empty() {
            return Err(ApiError::BadRequest("password is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

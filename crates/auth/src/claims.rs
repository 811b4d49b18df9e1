use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tenantgate_core::{Role, UserId};

/// Claims carried inside a signed token (transport-agnostic).
///
/// A `Claims` value is only trustworthy when it came out of
/// [`JwtValidator::validate`](crate::JwtValidator::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Access level of the caller.
    pub role: Role,

    /// Identifier of the authenticated identity.
    pub user_id: UserId,

    pub email: String,

    /// Process identifier of the issuing service.
    #[serde(rename = "iss")]
    pub issuer: String,

    /// Issued-at timestamp (whole seconds).
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp (whole seconds).
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature verification happens before this in [`crate::token`]; this only
/// looks at the embedded timestamps.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(issued_at: DateTime<Utc>, lifetime: Duration) -> Claims {
        Claims {
            role: Role::User,
            user_id: UserId::new(),
            email: "joe@example.org".to_string(),
            issuer: "tenantgate".to_string(),
            issued_at,
            expires_at: issued_at + lifetime,
        }
    }

    #[test]
    fn accepts_inside_window() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(15));
        assert_eq!(validate_claims(&claims, t0), Ok(()));
        assert_eq!(validate_claims(&claims, t0 + Duration::minutes(14)), Ok(()));
    }

    #[test]
    fn rejects_at_and_after_expiry() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(15));
        assert_eq!(
            validate_claims(&claims, t0 + Duration::minutes(15)),
            Err(TokenValidationError::Expired)
        );
        assert_eq!(
            validate_claims(&claims, t0 + Duration::hours(2)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_future_and_inverted_windows() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(15));
        assert_eq!(
            validate_claims(&claims, t0 - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );

        let inverted = claims_at(t0, Duration::minutes(-1));
        assert_eq!(
            validate_claims(&inverted, t0),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn timestamps_serialize_as_registered_claims() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(15));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iat"], t0.timestamp());
        assert_eq!(json["exp"], (t0 + Duration::minutes(15)).timestamp());
        assert_eq!(json["iss"], "tenantgate");
        assert_eq!(json["role"], "user");
    }
}

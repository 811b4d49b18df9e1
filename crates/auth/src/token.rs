//! Signed token issuance and validation (HMAC-signed JWT).
//!
//! Tokens are fully stateless: nothing is stored server-side and the embedded
//! expiry is the only lifetime bound. Issuer and validator must be built from
//! the same [`SigningSecret`].

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use tenantgate_core::Identity;

use crate::claims::{Claims, TokenValidationError, validate_claims};

/// Algorithms accepted on validation. Anything outside the HMAC family
/// (including `none`) is rejected before the signature is looked at.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Shared symmetric key used by both issuance and validation.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Token settings shared by issuer and validator.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: SigningSecret,
    /// Fixed process identifier written to (and required in) `iss`.
    pub issuer: String,
    pub lifetime: Duration,
}

impl TokenConfig {
    pub const DEFAULT_ISSUER: &'static str = "tenantgate";

    pub fn default_lifetime() -> Duration {
        Duration::minutes(15)
    }

    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            issuer: Self::DEFAULT_ISSUER.to_string(),
            lifetime: Self::default_lifetime(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing token")]
    Missing,

    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("unexpected token issuer")]
    InvalidIssuer,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    /// Key material or signing failure on our side.
    #[error("token processing failed: {0}")]
    Internal(String),
}

impl TokenError {
    /// Internal failures are server defects; everything else means the
    /// caller presented an unusable credential.
    pub fn is_internal(&self) -> bool {
        matches!(self, TokenError::Internal(_))
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnexpectedAlgorithm
            }
            ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
            ErrorKind::ExpiredSignature => TokenError::Claims(TokenValidationError::Expired),
            ErrorKind::ImmatureSignature => TokenError::Claims(TokenValidationError::NotYetValid),
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::RsaFailedSigning
            | ErrorKind::Crypto(_) => TokenError::Internal(err.to_string()),
            _ => TokenError::Malformed,
        }
    }
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs claims for authenticated identities.
pub struct Hs256JwtIssuer {
    key: EncodingKey,
    issuer: String,
    lifetime: Duration,
}

impl Hs256JwtIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            lifetime: config.lifetime,
        }
    }

    /// Derive the claims for `identity`, valid from `now` for the configured lifetime.
    pub fn claims_for(&self, identity: &Identity, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // JWT timestamps are whole seconds; truncate so the claims we hand
        // back equal the ones a validator will reconstruct.
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Internal(format!("token lifetime {} overflows expiry", self.lifetime)))?;
        Ok(Claims {
            role: identity.role,
            user_id: identity.id,
            email: identity.email.clone(),
            issuer: self.issuer.clone(),
            issued_at,
            expires_at,
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| TokenError::Internal(e.to_string()))
    }

    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = self.claims_for(identity, now)?;
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }
}

impl core::fmt::Debug for Hs256JwtIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256JwtIssuer")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Token validation contract used by the request pipeline.
pub trait JwtValidator: Send + Sync {
    /// Verify `token` and reconstruct its claims as of `now`.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        // Expiry is checked against the caller-supplied clock in `validate_claims`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let header = jsonwebtoken::decode_header(token)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::UnexpectedAlgorithm);
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for Hs256JwtValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256JwtValidator")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantgate_core::Role;

    const NONE_HEADER: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
    const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

    fn config(secret: &str) -> TokenConfig {
        TokenConfig::new(SigningSecret::new(secret.as_bytes()))
    }

    fn joe() -> Identity {
        Identity::new("joe@example.org", "secret", Role::User)
    }

    fn segments(token: &str) -> Vec<String> {
        token.split('.').map(str::to_string).collect()
    }

    #[test]
    fn issued_token_round_trips() {
        let cfg = config("be00d27d0c134cc79e473f40a1e393f0");
        let issuer = Hs256JwtIssuer::new(&cfg);
        let validator = Hs256JwtValidator::new(&cfg);
        let identity = joe();
        let now = Utc::now();

        let issued = issuer.issue(&identity, now).unwrap();
        let claims = validator.validate(&issued.token, now).unwrap();

        assert_eq!(claims, issued.claims);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.email, "joe@example.org");
        assert_eq!(claims.user_id, identity.id);
        assert_eq!(claims.issuer, "tenantgate");
        assert!(claims.expires_at > now);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::minutes(15));
    }

    #[test]
    fn expired_token_is_rejected_despite_valid_signature() {
        let cfg = config("secret");
        let issuer = Hs256JwtIssuer::new(&cfg);
        let validator = Hs256JwtValidator::new(&cfg);
        let now = Utc::now();

        let issued = issuer.issue(&joe(), now).unwrap();
        let later = now + Duration::minutes(16);

        let err = validator.validate(&issued.token, later).unwrap_err();
        assert_eq!(err, TokenError::Claims(TokenValidationError::Expired));
        assert!(!err.is_internal());
    }

    #[test]
    fn overflowing_lifetime_is_an_internal_error() {
        let mut cfg = config("secret");
        cfg.lifetime = Duration::milliseconds(i64::MAX);
        let issuer = Hs256JwtIssuer::new(&cfg);

        let err = issuer.issue(&joe(), Utc::now()).unwrap_err();
        assert!(err.is_internal(), "got {err:?}");
    }

    #[test]
    fn any_flipped_signature_byte_is_rejected() {
        let cfg = config("secret");
        let issuer = Hs256JwtIssuer::new(&cfg);
        let validator = Hs256JwtValidator::new(&cfg);
        let now = Utc::now();
        let issued = issuer.issue(&joe(), now).unwrap();

        let parts = segments(&issued.token);
        let signature = parts[2].clone();
        for idx in 0..signature.len() {
            let mut bytes = signature.clone().into_bytes();
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = format!(
                "{}.{}.{}",
                parts[0],
                parts[1],
                String::from_utf8(bytes).unwrap()
            );

            let err = validator.validate(&tampered, now).unwrap_err();
            assert!(!err.is_internal(), "byte {idx} produced {err:?}");
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let cfg = config("secret");
        let issuer = Hs256JwtIssuer::new(&cfg);
        let validator = Hs256JwtValidator::new(&cfg);
        let now = Utc::now();

        let user_token = issuer.issue(&joe(), now).unwrap().token;
        let admin = Identity::new("admin@example.org", "secret", Role::Admin);
        let admin_token = issuer.issue(&admin, now).unwrap().token;

        // Admin payload grafted onto the user's signature.
        let u = segments(&user_token);
        let a = segments(&admin_token);
        let forged = format!("{}.{}.{}", u[0], a[1], u[2]);

        assert_eq!(
            validator.validate(&forged, now).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let now = Utc::now();
        let issued = Hs256JwtIssuer::new(&config("one"))
            .issue(&joe(), now)
            .unwrap();

        let err = Hs256JwtValidator::new(&config("two"))
            .validate(&issued.token, now)
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidSignature);
    }

    #[test]
    fn none_algorithm_is_rejected() {
        let cfg = config("secret");
        let now = Utc::now();
        let issued = Hs256JwtIssuer::new(&cfg).issue(&joe(), now).unwrap();
        let parts = segments(&issued.token);

        let unsigned = format!("{NONE_HEADER}.{}.", parts[1]);
        let err = Hs256JwtValidator::new(&cfg)
            .validate(&unsigned, now)
            .unwrap_err();
        assert!(!err.is_internal());
    }

    #[test]
    fn non_hmac_algorithm_is_rejected() {
        let cfg = config("secret");
        let now = Utc::now();
        let issued = Hs256JwtIssuer::new(&cfg).issue(&joe(), now).unwrap();
        let parts = segments(&issued.token);

        let substituted = format!("{RS256_HEADER}.{}.{}", parts[1], parts[2]);
        assert_eq!(
            Hs256JwtValidator::new(&cfg)
                .validate(&substituted, now)
                .unwrap_err(),
            TokenError::UnexpectedAlgorithm
        );
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let mut foreign = config("secret");
        foreign.issuer = "someone-else".to_string();
        let now = Utc::now();
        let issued = Hs256JwtIssuer::new(&foreign).issue(&joe(), now).unwrap();

        assert_eq!(
            Hs256JwtValidator::new(&config("secret"))
                .validate(&issued.token, now)
                .unwrap_err(),
            TokenError::InvalidIssuer
        );
    }

    #[test]
    fn empty_and_garbage_tokens_are_client_errors() {
        let validator = Hs256JwtValidator::new(&config("secret"));
        let now = Utc::now();

        assert_eq!(validator.validate("", now).unwrap_err(), TokenError::Missing);
        let err = validator.validate("foobar", now).unwrap_err();
        assert_eq!(err, TokenError::Malformed);
        assert!(!err.is_internal());
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let cfg = config("super-secret-value");
        assert!(!format!("{cfg:?}").contains("super-secret-value"));
    }
}

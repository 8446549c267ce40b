//! HS256 token issuing and verification.
//!
//! Signature handling is delegated to `jsonwebtoken`; the deterministic
//! time-window checks stay in [`crate::claims::validate_claims`] so they can
//! be tested with an explicit clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use bookly_core::UserId;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// Issues and verifies HS256 bearer tokens for a single signing secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `user_id` valid for `lifetime` from `now`.
    pub fn issue(
        &self,
        user_id: UserId,
        email: &str,
        lifetime: Duration,
        refresh: bool,
        now: DateTime<Utc>,
    ) -> Result<(String, JwtClaims), TokenError> {
        // iat/exp travel as whole seconds; truncate so the returned claims
        // are identical to what a decoder will see.
        let claims = JwtClaims {
            sub: user_id,
            email: email.to_string(),
            jti: Uuid::new_v4(),
            refresh,
            issued_at: truncate_to_seconds(now),
            expires_at: truncate_to_seconds(now + lifetime),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))?;

        Ok((token, claims))
    }

    /// Verify signature and time window, returning the decoded claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

fn truncate_to_seconds(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}

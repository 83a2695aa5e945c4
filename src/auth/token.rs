//! JWT token issuance and validation
//!
//! Security notes:
//! - Tokens are signed with HS256 (HMAC-SHA256)
//! - Default expiry is 30 minutes
//! - The signing secret is process-wide configuration, loaded once at
//!   startup; rotating it invalidates all outstanding tokens
//! - There is no revocation list; an issued token stays valid until expiry

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::GatewayError;

/// Payload stored in a signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Outcome of token validation. Both variants are terminal for the request;
/// the caller must restart the auth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature failed to verify or the structure is malformed
    #[error("Invalid token")]
    Invalid,

    /// The token's expiry has elapsed
    #[error("Token expired")]
    Expired,
}

/// JWT signer and validator holding the process-wide secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl_seconds: u64,
}

impl TokenSigner {
    /// Create a new token signer
    ///
    /// Returns an error if the secret is empty or too short, or the
    /// default ttl is zero.
    pub fn new(secret: String, ttl_seconds: u64) -> Result<Self, GatewayError> {
        if secret.is_empty() {
            return Err(GatewayError::Config(
                "JWT_SECRET is required in production mode".into(),
            ));
        }

        if secret.len() < 32 {
            return Err(GatewayError::Config(
                "JWT_SECRET must be at least 32 characters".into(),
            ));
        }

        if ttl_seconds == 0 {
            return Err(GatewayError::Config(
                "Token ttl must be greater than zero".into(),
            ));
        }

        Ok(Self {
            secret,
            ttl_seconds,
        })
    }

    /// Create a signer for dev mode and tests
    pub fn new_dev() -> Self {
        Self {
            secret: "dev-only-insecure-secret-do-not-deploy".into(),
            ttl_seconds: 1800,
        }
    }

    /// Issue a token for an authenticated subject using the default ttl
    pub fn issue(&self, subject: &str) -> Result<String, GatewayError> {
        self.issue_with_ttl(subject, self.ttl_seconds)
    }

    /// Issue a token with an explicit ttl in seconds
    pub fn issue_with_ttl(&self, subject: &str, ttl_seconds: u64) -> Result<String, GatewayError> {
        if ttl_seconds == 0 {
            return Err(GatewayError::Config(
                "Token ttl must be greater than zero".into(),
            ));
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GatewayError::Internal(format!("System time error: {}", e)))?
            .as_secs();

        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl_seconds,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| GatewayError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify and decode a token
    ///
    /// Signature and expiry are checked locally; no store round-trip.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(auth_header: Option<&str>) -> Option<&str> {
    let token = auth_header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

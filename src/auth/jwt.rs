//! JWT token issuance and validation
//! Tokens are HMAC-signed, self-contained and expire 24 hours after issuance

use crate::{config::AppConfig, error::AppError};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of every issued token
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Minimum accepted secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Algorithms accepted on validation (symmetric MAC family only)
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID, stringified)
    pub sub: String,

    pub user_id: i64,

    pub email: String,

    /// Role ID, absent when the user has no role assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration
    pub exp: i64,
}

/// Validation failure kinds
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token invalid")]
    Invalid,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create JWT service from an explicit secret
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // The time window is checked against a single clock in `validate_at`
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(config.security.jwt_secret.expose_secret())
    }

    /// Issue a token for the given identity, valid from now for 24 hours
    pub fn issue(&self, user_id: i64, email: &str, role_id: Option<i64>) -> Result<String, AppError> {
        self.issue_at(user_id, email, role_id, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds)
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        role_id: Option<i64>,
        now: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            email: email.to_string(),
            role_id,
            iat: now,
            nbf: now,
            exp: now + TOKEN_TTL_SECS,
        };

        self.sign(&claims)
    }

    /// Sign arbitrary claims with HS256
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Validate and decode a token against the current time
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate and decode a token against `now` (unix seconds)
    ///
    /// Signature and algorithm are checked first. A token is valid only while
    /// `nbf <= now < exp`; reaching `exp` yields [`TokenError::Expired`], any
    /// other failure yields [`TokenError::Invalid`].
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?
            .claims;

        if now >= claims.exp {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(TokenError::Expired);
        }

        if now < claims.nbf {
            tracing::debug!(nbf = claims.nbf, now, "Token not yet valid");
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }
}

/*
 * Responsibility
 * - access token (HS256 compact JWS) の発行と検証
 * - 検証順: 形式 (3 つの base64url) → Malformed, alg/署名 → InvalidSignature,
 *   payload decode → Malformed, now >= exp → Expired
 * - exp は jsonwebtoken::Validation ではなくここでミリ秒単位で判定する
 *   (Validation は秒単位 + leeway のため境界が曖昧になる)
 */
use std::collections::HashSet;
use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;
use tracing::error;

use crate::services::auth::claims::Claims;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("token ttl must be at least one millisecond and keep exp in range")]
    InvalidTtl,

    #[error("token identity must not be empty")]
    EmptyIdentity,

    #[error("token secret must not be empty")]
    MissingSecret,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Key material and default lifetime, built once at startup from `Config`.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Issues and verifies access tokens.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        check_ttl(config.ttl)?;

        let secret = config.secret.as_bytes();

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl,
        })
    }

    /// Default lifetime of tokens from `issue_access_token`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token with the configured lifetime.
    pub fn issue_access_token(&self, username: &str, user_id: &str) -> Result<String, TokenError> {
        self.issue(username, user_id, self.ttl)
    }

    pub fn issue(&self, username: &str, user_id: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(username, user_id, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        username: &str,
        user_id: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        check_ttl(ttl)?;
        if username.is_empty() || user_id.is_empty() {
            return Err(TokenError::EmptyIdentity);
        }

        // The payload only carries milliseconds.
        let issued_at = now.trunc_subsecs(3);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidTtl)?
            .trunc_subsecs(3);
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            issued_at,
            expires_at,
        };

        let header = Header::new(ALGORITHM);
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign access token");
            TokenError::Signing(e)
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        check_compact_shape(token)?;

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?
            .claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn check_ttl(ttl: Duration) -> Result<(), TokenError> {
    if ttl < Duration::milliseconds(1) {
        return Err(TokenError::InvalidTtl);
    }
    Ok(())
}

// Exactly three non-empty, independently decodable base64url parts.
fn check_compact_shape(token: &str) -> Result<(), TokenError> {
    let mut parts = 0;
    for part in token.split('.') {
        parts += 1;
        if parts > 3 || part.is_empty() || URL_SAFE_NO_PAD.decode(part).is_err() {
            return Err(TokenError::Malformed);
        }
    }

    if parts != 3 {
        return Err(TokenError::Malformed);
    }
    Ok(())
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of every issued token.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Claims carried by an issued token.
///
/// Tokens attest only that *someone* authenticated recently: there is no
/// subject claim. `jti` is a random nonce so that two tokens issued within the
/// same second still differ.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch). Absent in expiry-only tokens.
    #[serde(default)]
    pub iat: i64,
    /// Unique token id. Absent in expiry-only tokens.
    #[serde(default)]
    pub jti: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is expired")]
    Expired,
    #[error("failed to generate token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and validates HS256 tokens with a symmetric key supplied at
/// construction time.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    /// Creates a service signing with `secret` and the standard one hour lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_lifetime(secret, Duration::seconds(TOKEN_LIFETIME_SECS))
    }

    pub fn with_lifetime(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is expired as soon as now > exp.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    /// Generates a fresh token expiring `lifetime` from now.
    pub fn generate_token(&self) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.lifetime).ok_or_else(|| {
            TokenError::Encoding(format!("token lifetime {} overflows", self.lifetime))
        })?;
        let claims = Claims {
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Errors are classified as `Malformed` when the string is not a token at
    /// all, `InvalidSignature` when it was signed with a different key, and
    /// `Expired` once the embedded expiry has passed.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

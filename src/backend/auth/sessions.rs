/**
 * Session Tokens
 *
 * Tokens are HS256 JWTs issued by the login service. This module checks
 * them and resolves the subject to a `PublicUser`. `create_token` mints
 * tokens with the same claims layout, for tooling and tests.
 */

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::directory::UserDirectory;
use crate::backend::error::BackendError;
use crate::shared::PublicUser;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username, informational only
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Why a credential was refused
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("invalid credential: token expired")]
    ExpiredCredential,
    #[error("invalid credential: unknown user")]
    UnknownSubject,
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `user_id` - User ID (UUID)
/// * `username` - Optional display name carried in the claims
/// * `secret` - HMAC secret
/// * `ttl` - Token lifetime
pub fn create_token(
    user_id: Uuid,
    username: Option<String>,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        username,
        exp: now + ttl.as_secs(),
        iat: now,
    };
    encode_claims(&claims, secret)
}

/// Sign arbitrary claims, used when a caller needs to control timestamps
pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
            _ => AuthError::InvalidCredential,
        })
}

/// Extract user ID from token
pub fn get_user_id_from_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let claims = verify_token(token, secret)?;
    Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidCredential)
}

/// Take the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve a credential to the user it identifies
///
/// Fails with `MissingCredential` when no token was presented, with
/// `InvalidCredential`/`ExpiredCredential` when the signature or claims are
/// rejected, and with `UnknownSubject` when the directory has no such user.
pub async fn authenticate(
    directory: &dyn UserDirectory,
    secret: &str,
    token: Option<&str>,
) -> Result<PublicUser, BackendError> {
    let token = token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredential)?;
    let user_id = get_user_id_from_token(token, secret)?;

    match directory.find_user(user_id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!("[Auth] Token subject {} is not in the directory", user_id);
            Err(AuthError::UnknownSubject.into())
        }
    }
}

//! GraphQL authentication
//!
//! Bearer tokens are HS256 JWTs carrying `{ "userId": <int> }`. Decoding is
//! tolerant at the request boundary: a missing or bad token leaves the
//! request anonymous, and each resolver decides whether it needs an
//! identity through [`AuthExt::auth_user`].

use async_graphql::{Context, ErrorExtensions};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppSecret;
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity decoded from a bearer token, available in GraphQL resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenPayload {
    pub user_id: i32,
}

/// Wire form of the token. `iat` and `exp` are optional: tokens minted
/// without an expiry stay valid, an `exp` that is present is enforced.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims {
    user_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token found")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Decode the value of an `Authorization` header.
///
/// A leading `"Bearer "` is stripped if present; whatever remains is the token.
pub fn decode_auth_header(
    header: Option<&str>,
    secret: &AppSecret,
) -> Result<AuthTokenPayload, AuthError> {
    let raw = header.unwrap_or_default();
    let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw);

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(AuthError::InvalidToken)?;

    Ok(AuthTokenPayload {
        user_id: token_data.claims.user_id,
    })
}

/// Resolve the identity for one request.
///
/// Any decode failure is logged and treated as "no identity"; rejecting the
/// request is left to the resolvers.
pub fn resolve_identity(header: Option<&str>, secret: &AppSecret) -> Option<AuthTokenPayload> {
    let header = header?;

    match decode_auth_header(Some(header), secret) {
        Ok(payload) => {
            tracing::debug!(user_id = payload.user_id, "Bearer token accepted");
            Some(payload)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected, continuing unauthenticated");
            None
        }
    }
}

/// Sign a token for `user_id`, optionally expiring after `ttl`
pub fn issue_token(
    user_id: i32,
    secret: &AppSecret,
    ttl: Option<Duration>,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = TokenClaims {
        user_id,
        iat: Some(now.timestamp()),
        exp: ttl.map(|ttl| (now + ttl).timestamp()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Signing)
}

/// Extension trait to get the authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or fail with `Unauthorized`
    fn auth_user(&self) -> async_graphql::Result<&AuthTokenPayload>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> async_graphql::Result<&AuthTokenPayload> {
        self.data_opt::<AuthTokenPayload>()
            .ok_or_else(|| ApiError::Unauthorized.extend())
    }
}

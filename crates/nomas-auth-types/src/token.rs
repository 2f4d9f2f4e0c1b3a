//! JWT access/refresh token handling.

#[cfg(any(feature = "ISSUER", test))]
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, Validation, decode};
#[cfg(any(feature = "ISSUER", test))]
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// Default access-token lifetime in seconds (1 hour).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 3600;

/// Default refresh-token lifetime in seconds (1 day).
pub const REFRESH_TOKEN_TTL_SECS: u64 = 86400;

/// Distinguishes access tokens from refresh tokens signed with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// User identity extracted from a validated access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: i32,
    pub exp: u64,
}

/// Errors returned by token validation and issuing.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("wrong token type")]
    WrongTokenType,
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id as decimal string |
/// | `token_type` | custom | `"access"` or `"refresh"` |
/// | `iat` | `iat` | issue time, seconds since epoch |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub token_type: TokenType,
    pub iat: u64,
    pub exp: u64,
}

#[cfg(any(feature = "ISSUER", test))]
fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked with the default 60s leeway, required
/// claims `exp` + `sub`.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

fn validate_typed(token: &str, secret: &str, expected: TokenType) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.token_type != expected {
        return Err(AuthError::WrongTokenType);
    }
    let user_id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        exp: claims.exp,
    })
}

/// Validate a bearer access token, returning the user it was issued for.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    validate_typed(token, secret, TokenType::Access)
}

/// Validate a refresh token presented to the refresh endpoint.
#[cfg(any(feature = "ISSUER", test))]
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    validate_typed(token, secret, TokenType::Refresh)
}

/// A freshly signed token and its expiration.
#[cfg(any(feature = "ISSUER", test))]
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: u64,
}

/// Sign a token of the given type for `user_id`, valid for `ttl_secs`.
///
/// Requires the `ISSUER` feature; only the API service and test helpers mint tokens.
#[cfg(any(feature = "ISSUER", test))]
pub fn issue_token(
    user_id: i32,
    token_type: TokenType,
    ttl_secs: u64,
    secret: &str,
) -> Result<IssuedToken, AuthError> {
    let iat = now_secs();
    let exp = iat + ttl_secs;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        token_type,
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Encoding(e.to_string()))?;
    Ok(IssuedToken { token, exp })
}

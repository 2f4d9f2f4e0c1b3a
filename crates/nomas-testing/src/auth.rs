//! Bearer-token helpers for authenticated test requests.

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use nomas_auth_types::token::{
    ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS, TokenType, issue_token,
};

/// Secret shared by test apps and the tokens minted here.
pub const TEST_JWT_SECRET: &str = "test-secret";

/// Signed access token for `user_id`.
pub fn access_token(user_id: i32, secret: &str) -> String {
    issue_token(user_id, TokenType::Access, ACCESS_TOKEN_TTL_SECS, secret)
        .expect("failed to sign access token")
        .token
}

/// Signed refresh token for `user_id`.
pub fn refresh_token(user_id: i32, secret: &str) -> String {
    issue_token(user_id, TokenType::Refresh, REFRESH_TOKEN_TTL_SECS, secret)
        .expect("failed to sign refresh token")
        .token
}

/// `Authorization: Bearer <access>` header pair, ready for `add_header`.
pub fn bearer(user_id: i32, secret: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {}", access_token(user_id, secret)))
        .expect("token is a valid header value");
    (AUTHORIZATION, value)
}

//! `Authorization: Bearer <token>` extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

/// Raw bearer token taken from the `Authorization` header.
///
/// Returns 401 if the header is absent, not valid UTF-8, uses another scheme,
/// or carries an empty token. Signature checks happen after extraction.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Parse a header value of the form `Bearer <token>` (scheme is case-insensitive).
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Header parsing is synchronous; the returned future owns its data so no
    // lifetime from `parts` is captured.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_owned);

        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self(token))
        }
    }
}

//! Request extractors that reject with [`ApiError`] instead of axum's plain-text errors.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use nomas_auth_types::bearer::BearerToken;
use nomas_auth_types::token::validate_access_token;

use crate::domain::repository::UserRepository;
use crate::domain::types::Caller;
use crate::error::ApiError;
use crate::state::AppState;

/// JSON body; malformed or mistyped input answers 400 `VALIDATION`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::field("body", rejection.body_text())),
        }
    }
}

/// Query string; unparseable parameters answer 400 `VALIDATION`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::field("query", rejection.body_text())),
        }
    }
}

/// Numeric `{id}` path segment; anything else answers 404.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i32);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound("resource"))?;
        Ok(Self(id))
    }
}

/// Authenticated caller, reloaded from the database on every request.
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;
        let info =
            validate_access_token(&token, &state.jwt.secret).map_err(|_| ApiError::InvalidToken)?;
        let user = state
            .user_repo()
            .find_by_id(info.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(ApiError::InvalidToken)?;
        Ok(Caller { user })
    }
}

//! Custom Axum extractors
//!
//! The `Valid*` wrappers decode like axum's own extractors but reject with
//! `ApiError`, so a bad path segment, query string or body still gets the
//! JSON `{error, message}` shape with status 400.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::server::AppState;
use crate::db::{Id, UserRepo};
use crate::models::ValidationError;

/// Header set by the authenticating reverse proxy
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// The user every handler acts on behalf of
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Id,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(REMOTE_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let user = UserRepo::new(&state.pool)
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                tracing::debug!(username, "unknown remote user");
                ApiError::Unauthorized
            })?;

        Ok(Self { id: user.id })
    }
}

fn malformed(part: &'static str, reason: String) -> ApiError {
    ApiError::Validation(ValidationError::Malformed { part, reason })
}

/// Path parameters decoded into `T`
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed("path", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string decoded into `T`
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed("query", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON body decoded into `T`; missing content type, bad syntax and
/// missing fields are all 400
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| malformed("body", rejection.body_text()))?;
        Ok(Self(value))
    }
}

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::Json;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;
use crate::validate::Validate;

/// Represents the currently authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Per-request context handed to handlers instead of ambient session state.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<CurrentUser>,
}

impl RequestContext {
    pub fn logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Extractor that requires authentication.
/// Returns 401 if no valid session found.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        RequestContext::from_request_parts(parts, state)
            .await?
            .user
            .ok_or(AppError::Unauthorized)
    }
}

/// Never rejects for a missing or stale session; only store failures fail.
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts, &state.config.auth.cookie_name) else {
            return Ok(RequestContext::default());
        };

        let conn = state.db.get()?;
        let user = conn
            .query_row(
                "SELECT u.id, u.username FROM sessions s \
                 JOIN users u ON u.id = s.user_id \
                 WHERE s.token = ?1 AND s.expires_at > datetime('now')",
                params![token],
                |row| {
                    Ok(CurrentUser {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;

        if user.is_none() {
            tracing::debug!("Ignoring unknown or expired session cookie");
        }
        Ok(RequestContext { user })
    }
}

/// Pull a named cookie's value out of the request headers.
pub fn cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

fn session_token<'a>(parts: &'a Parts, cookie_name: &str) -> Option<&'a str> {
    cookie_value(parts, cookie_name).filter(|t| !t.is_empty())
}

/// JSON body that has been decoded and passed [`Validate`]. Either step
/// failing yields a `validation_failed` error before the handler runs.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::Validation(rejection.body_text()))?;
        value.validate().map_err(AppError::Validation)?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters decoded into `T`. A segment that does not parse (say
/// `abc` for an `i64` id) is a `validation_failed` error, not plain text.
pub struct ValidatedPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| AppError::Validation(rejection.body_text()))?;
        Ok(ValidatedPath(value))
    }
}

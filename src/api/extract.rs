use crate::error::AppError;
use axum::{
    Form, Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;

/// Request body accepted either as JSON or as an url-encoded form.
///
/// The form decoder is picked when the `Content-Type` says so; everything else goes through
/// the JSON decoder. Any rejection becomes `AppError::BadRequest`.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) =
                Form::<T>::from_request(req, state).await.map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// The `{id}` segment of `/api/users/{id}`.
#[derive(Debug, Clone, Copy)]
pub struct UserIdParam(pub i64);

impl<S> FromRequestParts<S> for UserIdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid user id".into()))?;
        Ok(Self(id))
    }
}

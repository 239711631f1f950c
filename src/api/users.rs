use crate::api::AppState;
use crate::api::extract::{Payload, UserIdParam};
use crate::api::schemas::users::{CreatedUser, MessageResponse, UserPayload, UserResponse};
use crate::error::{AppError, Result};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Lists every user.
///
/// # Errors
/// Returns `AppError::Database` if the store cannot be read.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list_users().await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(body))
}

/// Creates a user and responds with its id.
///
/// # Errors
/// Returns `AppError::BadRequest` for a malformed body.
/// Returns `AppError::Conflict` if the email is already registered.
pub async fn create_user(
    State(state): State<AppState>,
    Payload(payload): Payload<UserPayload>,
) -> Result<impl IntoResponse> {
    let id = state.user_service.create_user(&payload.name, &payload.email).await?;
    Ok((StatusCode::CREATED, Json(CreatedUser { id })))
}

/// # Errors
/// Returns `AppError::NotFound` if no user has this id.
pub async fn get_user(State(state): State<AppState>, UserIdParam(id): UserIdParam) -> Result<impl IntoResponse> {
    match state.user_service.get_user(id).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(AppError::NotFound),
    }
}

/// Overwrites a user's name and email. An unknown id still answers 200.
///
/// # Errors
/// Returns `AppError::BadRequest` for a malformed body.
/// Returns `AppError::Conflict` if the email belongs to another user.
pub async fn update_user(
    State(state): State<AppState>,
    UserIdParam(id): UserIdParam,
    Payload(payload): Payload<UserPayload>,
) -> Result<impl IntoResponse> {
    state.user_service.update_user(id, &payload.name, &payload.email).await?;
    Ok(Json(MessageResponse::new("User updated")))
}

/// Deletes a user. An unknown id still answers 200.
///
/// # Errors
/// Returns `AppError::Database` if the delete fails.
pub async fn delete_user(State(state): State<AppState>, UserIdParam(id): UserIdParam) -> Result<impl IntoResponse> {
    state.user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

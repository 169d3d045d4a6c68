// REST handlers for the store
// Each handler decodes its inputs, calls one store operation and serializes the result

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::types::{ApiError, Payload};
use crate::engine::store::SharedStore;
use crate::models::{parse_id, Message, MessageInput, User, UserInput};
use crate::PostboxError;

/// Shared application state for the REST API
pub type ApiState = SharedStore;

/// Resolve a `:id` path segment to a user id
///
/// A segment that is not a number names no user at all.
fn user_id(raw: &str) -> Result<i64, PostboxError> {
    parse_id(raw).ok_or_else(|| PostboxError::user_not_found(None))
}

fn message_id(raw: &str) -> Result<i64, PostboxError> {
    parse_id(raw).ok_or_else(|| PostboxError::message_not_found(None))
}

/// GET /
pub async fn index() -> &'static str {
    "Hello World!"
}

/// GET /users
pub async fn list_users(State(store): State<ApiState>) -> Json<Vec<User>> {
    Json(store.list_users().await)
}

/// GET /users/:id
pub async fn get_user(
    State(store): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = user_id(&id).map_err(ApiError::lookup)?;
    let user = store.get_user(id).await.map_err(ApiError::lookup)?;
    Ok(Json(user))
}

/// POST /users
pub async fn create_user(
    State(store): State<ApiState>,
    Payload(input): Payload<UserInput>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(store.create_user(input).await?))
}

/// PUT /users/:id
pub async fn replace_user(
    State(store): State<ApiState>,
    Path(id): Path<String>,
    Payload(input): Payload<UserInput>,
) -> Result<Json<User>, ApiError> {
    // missing fields are reported before an unknown id
    input.require_all()?;
    Ok(Json(store.replace_user(user_id(&id)?, input).await?))
}

/// PATCH /users/:id
pub async fn patch_user(
    State(store): State<ApiState>,
    Path(id): Path<String>,
    Payload(input): Payload<UserInput>,
) -> Result<Json<User>, ApiError> {
    input.require_any()?;
    Ok(Json(store.patch_user(user_id(&id)?, input).await?))
}

/// DELETE /users/:id
///
/// Checks that the user exists, then answers 501; nothing is removed.
pub async fn delete_user(
    State(store): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Infallible, ApiError> {
    Ok(store.delete_user(user_id(&id)?).await?)
}

/// GET /users/:id/messages
///
/// Answers with the messages NOT addressed to the user; see
/// `Store::messages_excluding_recipient`.
pub async fn user_messages(
    State(store): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(store.messages_excluding_recipient(user_id(&id)?).await?))
}

/// GET /messages
pub async fn list_messages(State(store): State<ApiState>) -> Json<Vec<Message>> {
    Json(store.list_messages().await)
}

/// GET /messages/:id
pub async fn get_message(
    State(store): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = message_id(&id).map_err(ApiError::lookup)?;
    let message = store.get_message(id).await.map_err(ApiError::lookup)?;
    Ok(Json(message))
}

/// POST /messages
pub async fn create_message(
    State(store): State<ApiState>,
    Payload(input): Payload<MessageInput>,
) -> Result<Json<Message>, ApiError> {
    Ok(Json(store.create_message(input).await?))
}

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

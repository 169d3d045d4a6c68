// REST API boundary types
// Error responses and the request body extractor shared by every handler

use axum::{
    async_trait,
    body::HttpBody,
    extract::FromRequest,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::{IntoResponse, Response},
    BoxError, Form, Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::PostboxError;

/// Error returned by a REST handler
///
/// The body is always plain text. Status codes follow the store's error:
/// unknown ids on plain reads answer 404, every other rejection answers 400,
/// and the unimplemented delete answers 501.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// A 400 carrying `message` as its body
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Map a store error raised while serving a plain read
    ///
    /// `NotFound` becomes a bare 404, as for any unknown resource.
    pub fn lookup(err: PostboxError) -> Self {
        match err {
            PostboxError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: "Not Found".to_string(),
            },
            other => Self::from(other),
        }
    }
}

impl From<PostboxError> for ApiError {
    fn from(err: PostboxError) -> Self {
        let status = match err {
            PostboxError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            PostboxError::Validation
            | PostboxError::Conflict { .. }
            | PostboxError::NotFound { .. }
            | PostboxError::SenderNotFound { .. }
            | PostboxError::RecipientNotFound { .. } => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(status = self.status.as_u16(), message = %self.message, "request rejected");
        (self.status, self.message).into_response()
    }
}

/// Request body decoded from JSON or from a urlencoded form
///
/// The content type picks the decoder. A request with neither content type
/// (typically one with no body at all) yields `T::default()`, so the store's
/// own field checks report what is missing. A body that cannot be decoded
/// at all is rejected with a plain-text 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            Ok(Payload(value))
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            Ok(Payload(value))
        } else {
            Ok(Payload(T::default()))
        }
    }
}

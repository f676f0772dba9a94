//! API responses and error mapping.
//!
//! Every error leaves the server as `{"message": "..."}` with a matching
//! status code. Handler errors are built as [`ApiError`]; responses
//! produced by middleware (timeouts, unknown routes) are rewritten by
//! [`json_error_body`].

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// `{"message": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Handler failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Content can not be empty!")]
    EmptyContent,

    #[error("Data to update can not be empty!")]
    EmptyUpdate,

    #[error("Not found Tutorial with id {0}")]
    NotFound(String),

    #[error("Cannot update Tutorial with id={0}. Maybe Tutorial was not found!")]
    UpdateMissing(String),

    #[error("Cannot delete Tutorial with id={0}. Maybe Tutorial was not found!")]
    DeleteMissing(String),

    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("{}", .0.body_text())]
    Form(#[from] FormRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyContent | ApiError::EmptyUpdate => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::UpdateMissing(_) | ApiError::DeleteMissing(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Form(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(Message::new(self.to_string()))).into_response()
    }
}

/// Largest plain-text error body carried over into a JSON message.
const ERROR_BODY_LIMIT: usize = 4096;

/// Rewrite an error response that is not JSON into a [`Message`] body.
///
/// The original text is kept as the message when there is one; an empty
/// body falls back to the status reason phrase.
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = axum::body::to_bytes(body, ERROR_BODY_LIMIT)
        .await
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());

    let mut rewritten = (status, Json(Message::new(message))).into_response();
    for (name, value) in parts.headers.iter() {
        if *name != header::CONTENT_TYPE && *name != header::CONTENT_LENGTH {
            rewritten.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rewritten
}

//! Request identification and body extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Attach the ID to the request span and echo it on the response
//! - Turn JSON or form bodies into inputs, treating a missing body as empty
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Bodies are accepted as JSON or `application/x-www-form-urlencoded`
//! - A body with neither content type counts as empty input

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request as ExtractRequest},
    http::{header, HeaderName, Request},
    Form, Json,
};
use serde::de::DeserializeOwned;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer assigning `x-request-id` to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying `x-request-id` from the request to the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Span for one HTTP request, tagged with its ID.
pub fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Request body given either as JSON or as a urlencoded form.
///
/// Without a recognised content type the body is `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct JsonOrForm<T>(pub T);

fn is_form(request: &ExtractRequest) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(request: ExtractRequest, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&request) {
            let Form(value) = Form::<T>::from_request(request, state).await?;
            return Ok(Self(value));
        }

        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(Self(T::default())),
            Err(rejection) => Err(ApiError::Body(rejection)),
        }
    }
}

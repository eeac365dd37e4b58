//! API Error Taxonomy
//!
//! Every failure surfaced over HTTP maps to one of these variants. Error
//! bodies always carry a stable `message` field; validation failures
//! additionally carry a structured `errors` list. Storage error text never
//! reaches the client.

use crate::auth::user_store::UserStoreError;
use crate::inventory::store::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

/// A single violated field in a request payload.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input; carries every violated field.
    Validation(Vec<FieldError>),
    /// Unparsable request body.
    BadRequest(&'static str),
    Unauthenticated(&'static str),
    Forbidden,
    NotFound,
    Conflict(&'static str),
    InsufficientStock,
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Validation failed", "errors": errors })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Admin only" })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Not found" })),
            )
                .into_response(),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::InsufficientStock => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Insufficient stock" })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName => ApiError::Conflict("Sweet name already exists"),
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<UserStoreError> for ApiError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::DuplicateUsername => ApiError::Conflict("username already taken"),
            UserStoreError::NotFound => ApiError::NotFound,
            UserStoreError::Hash(e) => ApiError::Internal(e.into()),
            UserStoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

/// `Json` wrapper that turns body rejections into the standard error shape
/// instead of axum's plain-text responses.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(_) => Err(ApiError::BadRequest("Malformed JSON in request body")),
        }
    }
}

/// `Path` wrapper that turns unparsable path parameters into the standard
/// error shape. Axum's default rejection leaks its parse error as plain text.
pub struct AppPath<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(_) => Err(ApiError::Validation(vec![FieldError::new(
                "id",
                "id must be an integer",
            )])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Validation(Vec::new()), StatusCode::BAD_REQUEST),
            (
                ApiError::Unauthenticated("Missing token"),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Conflict("username already taken"),
                StatusCode::CONFLICT,
            ),
            (ApiError::InsufficientStock, StatusCode::BAD_REQUEST),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_error_conversion() {
        let api_err: ApiError = StoreError::DuplicateName.into();
        assert!(matches!(api_err, ApiError::Conflict(_)));

        let api_err: ApiError = UserStoreError::NotFound.into();
        assert!(matches!(api_err, ApiError::NotFound));
    }
}

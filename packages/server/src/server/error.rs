//! HTTP error mapping for REST handlers.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::common::{AppError, ValidationError};
use crate::kernel::DatabaseError;

/// `Json` extractor whose rejections render as `ApiError` bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Error returned by every route. Renders as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Logged server-side; the client only sees `public`.
    Internal {
        public: &'static str,
        cause: String,
    },
}

impl ApiError {
    pub fn internal(public: &'static str, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            public,
            cause: cause.to_string(),
        }
    }

    /// Status an `AppError` renders with, for handlers that shape their own body.
    pub fn status_of(err: &AppError) -> StatusCode {
        match err {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(v) => ApiError::BadRequest(v.to_string()),
            AppError::NotFound(message) => ApiError::NotFound(message),
            AppError::Conflict(message) => ApiError::Conflict(message),
            AppError::Upload(cause) => ApiError::internal("Image upload failed", cause),
            other => ApiError::internal("Internal server error", other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::internal("Internal server error", err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid form data: {}", err.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) | ApiError::Conflict(m) => m,
            ApiError::Internal { public, cause } => {
                error!(error = %cause, "{}", public);
                public.to_string()
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

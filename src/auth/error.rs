use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::{dto::AuthResponse, validation::FieldErrors};

/// Everything an auth operation can fail with. Backend detail is logged, never carried.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fix the form errors")]
    Validation(FieldErrors),

    /// Body was not a JSON object of the expected shape, or not JSON at all.
    #[error("Invalid request body")]
    MalformedBody,

    #[error("Email already exists")]
    EmailTaken,

    /// Unknown email and wrong password are deliberately the same variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("Service temporarily unavailable. Please try again.")]
    StoreUnavailable,

    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::MalformedBody => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(reason = %rejection.body_text(), "rejected request body");
        AuthError::MalformedBody
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AuthError::Internal(detail) = &self {
            tracing::error!(%detail, "internal auth error");
        }
        let mut body = AuthResponse::failure(self.to_string());
        if let AuthError::Validation(errors) = self {
            body.errors = Some(errors);
        }
        (status, Json(body)).into_response()
    }
}

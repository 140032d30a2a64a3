use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::result::EmptyResponse;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid email or password")]
    AuthFailed,
    #[error("unknown area: {0}")]
    UnknownArea(String),
    #[error("authentication service unavailable")]
    Upstream,
    #[error("failed to persist session")]
    SessionStorage,
    #[error("internal server error")]
    InternalServerError,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::AuthFailed => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::UnknownArea(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            AppError::Upstream => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
            AppError::SessionStorage | AppError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = error_to_api_response::<EmptyResponse>(code, self.to_string());
        (status, body).into_response()
    }
}

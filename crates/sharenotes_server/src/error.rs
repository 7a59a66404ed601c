//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Wrapper that renders an [`AppError`] as a JSON error envelope.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl HttpError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match &self.0 {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Paste not found or expired".to_string(),
            ),
            AppError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message.clone(),
            ),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = Json(json!({ "error": { "code": code, "message": message } }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharenotes_core::SnowflakeError;

    #[test]
    fn status_mapping() {
        let cases = [
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::Validation("content must not be empty".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::IdGeneration(SnowflakeError::ClockRegression {
                    last_ms: 10,
                    now_ms: 9,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::TokenCollision {
                    token: "00000000001".to_string(),
                    id: 1,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError(err).into_response().status(), expected);
        }
    }
}

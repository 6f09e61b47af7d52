use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Reasons a generative backend reply could not be turned into typed records
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed reply: {0}")]
    MalformedJson(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("expected {expected} items, found {found}")]
    WrongItemCount { expected: usize, found: usize },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Coarse failure class, so callers can pick a retry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The model or one of its helper services misbehaved
    Upstream,
    /// The caller sent something we can't act on
    BadRequest,
    /// History storage failed or the user is unknown
    Storage,
    Internal,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Generative backend error: {0}")]
    Backend(String),

    #[error("Failed to parse backend reply: {0}")]
    Parse(#[from] ParseError),

    #[error("Poster lookup error: {0}")]
    Enrichment(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Missing or invalid identity")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Recommendation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Backend(_)
            | AppError::Parse(_)
            | AppError::Enrichment(_)
            | AppError::Timeout(_) => ErrorKind::Upstream,
            AppError::Validation(_) | AppError::Unauthorized | AppError::Forbidden(_) => {
                ErrorKind::BadRequest
            }
            AppError::Persistence(_) | AppError::UserNotFound(_) => ErrorKind::Storage,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Backend(_) | AppError::Parse(_) | AppError::Enrichment(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_upstream() {
        let err = AppError::from(ParseError::WrongItemCount {
            expected: 4,
            found: 3,
        });
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(
            err.to_string(),
            "Failed to parse backend reply: expected 4 items, found 3"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AppError::Validation("x".into()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            AppError::UserNotFound("u".into()).kind(),
            ErrorKind::Storage
        );
        assert_eq!(AppError::Enrichment("x".into()).kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Backend("down".into()), StatusCode::BAD_GATEWAY),
            (AppError::Timeout(60), StatusCode::GATEWAY_TIMEOUT),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (AppError::UserNotFound("u".into()), StatusCode::NOT_FOUND),
            (AppError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::BadRequest).unwrap();
        assert_eq!(json, "\"bad_request\"");
    }
}

// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // 400, route-level missing input. Rendered without a kind prefix.
    BadRequest(String),

    // 4xx from the body extractor (syntax 400, shape 422, content type 415, size 413). No kind prefix.
    Rejected(StatusCode, String),

    // 500, schema-level rejection (malformed email, empty required column)
    Validation(String),

    // 500, store constraint violation (duplicate email)
    Constraint(String),

    // 500, bad credentials or unknown/deleted user
    AuthError(String),

    // 403, missing/invalid token or denied ownership
    Forbidden(String),

    // 500, absent entity
    NotFound(String),

    // 500
    InternalServerError(String),
}

impl AppError {
    /// Kind name shown in the `"<kind> : <detail>"` envelope message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) | AppError::Rejected(..) | AppError::Validation(_) => {
                "ValidationError"
            }
            AppError::Constraint(_) => "ConstraintError",
            AppError::AuthError(_) | AppError::Forbidden(_) => "AuthError",
            AppError::NotFound(_) => "NotFoundError",
            AppError::InternalServerError(_) => "InternalError",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Rejected(_, msg)
            | AppError::Validation(msg)
            | AppError::Constraint(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected(status, _) => *status,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.kind(), self.detail())
    }
}

impl std::error::Error for AppError {}

/// Converts the error into the `{ success: false, message }` envelope.
/// Route-level 400s carry their message verbatim; everything else is `"<kind> : <detail>"`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest(msg) | AppError::Rejected(_, msg) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, message);
        }

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError`.
/// Integrity violations keep their kind; everything else is internal.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation, foreign_key_violation
                Some("23505") | Some("23503") => {
                    return AppError::Constraint(db_err.message().to_string());
                }
                // not_null_violation, check_violation
                Some("23502") | Some("23514") => {
                    return AppError::Validation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        AppError::InternalServerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_combines_kind_and_detail() {
        let err = AppError::AuthError("INVALID CREDENTIALS".to_string());
        assert_eq!(err.to_string(), "AuthError : INVALID CREDENTIALS");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Rejected(StatusCode::PAYLOAD_TOO_LARGE, "x".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Constraint("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

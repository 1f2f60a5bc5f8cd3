// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! API error type shared by all handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::email::EmailError;
use crate::storage::StorageError;

/// An error ready to be rendered as an HTTP response.
///
/// Handlers return `Result<_, ApiError>`; storage and auth errors convert
/// into it with status codes already decided, so handler bodies stay about
/// the happy path.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Machine-readable code, carried over from auth failures so their
    /// responses look the same whether raised by the extractor or a handler.
    pub error_code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.error_code {
            Some(code) => Json(json!({ "error": self.message, "error_code": code })),
            None => Json(json!({ "error": self.message })),
        };

        if self.status == StatusCode::UNAUTHORIZED {
            (
                self.status,
                [(axum::http::header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ApiError::not_found(err.to_string()),
            StorageError::AlreadyExists(_) => ApiError::conflict(err.to_string()),
            other => {
                tracing::error!(error = %other, "storage error");
                ApiError::internal()
            }
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        tracing::error!(error = %err, "email delivery failed");
        ApiError::internal()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(detail) => {
                tracing::error!(detail, "auth error");
                ApiError::internal()
            }
            other => ApiError {
                status: other.status_code(),
                message: other.to_string(),
                error_code: Some(other.error_code()),
            },
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Authentication error types.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors raised while authenticating a request or managing credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on a protected route
    #[error("Not authenticated")]
    MissingAuthHeader,

    /// `Authorization` header present but not a well-formed bearer scheme
    #[error("Invalid authorization header")]
    InvalidAuthHeader,

    /// Bad password, unknown subject, or a token that failed verification.
    /// Deliberately opaque so callers cannot probe which check failed.
    #[error("Could not validate credentials")]
    InvalidCredentials,

    /// Hashing or signing failure on our side
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code for API clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AuthError::Internal(detail) = &self {
            tracing::error!(detail, "auth internal error");
        }

        let message = match &self {
            // Never leak internal details to the client
            AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "error_code": self.error_code(),
        }));

        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_variants_map_to_401() {
        assert_eq!(
            AuthError::MissingAuthHeader.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidAuthHeader.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_credentials_message_is_opaque() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Could not validate credentials"
        );
    }

    #[test]
    fn unauthorized_response_carries_www_authenticate() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }
}

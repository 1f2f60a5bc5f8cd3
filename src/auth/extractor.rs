// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Axum extractor for bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use super::AuthError;
use crate::state::AppState;

/// Identity established from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Subject email from the token claims
    pub email: String,
}

/// Extractor that rejects the request with 401 unless a valid bearer token
/// is presented.
///
/// ```ignore
/// async fn handler(Auth(user): Auth, ...) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let email = state.tokens.verify(token)?;
        Ok(Auth(AuthenticatedUser { email }))
    }
}

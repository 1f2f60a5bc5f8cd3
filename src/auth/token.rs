// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Bearer token issuing and verification.
//!
//! Tokens are compact JWTs signed with a configured HMAC secret, carrying
//! `sub` (the user's email) and `exp`. There is no revocation list; validity
//! is signature plus expiry, nothing else.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Token lifetime used when the deployment does not configure one.
const DEFAULT_TTL_MINUTES: i64 = 15;

/// Signed claims. `sub` is the subject email, `exp` a Unix timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Issues and verifies bearer tokens with a fixed key and algorithm.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the configured secret and algorithm.
    ///
    /// `ttl` of `None` falls back to the 15 minute default.
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Option<Duration>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            ttl: ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_TTL_MINUTES)),
        }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` using the configured ttl.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issue a token for `subject` with an explicit ttl.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify a token and return its subject.
    ///
    /// Fails closed: signature mismatch, malformed structure and expiry all
    /// map to the same `InvalidCredentials` outcome so the response never
    /// reveals which check failed.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        // No clock-skew allowance; a stale token is a stale token.
        validation.leeway = 0;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidCredentials)?;

        // The library only rejects exp strictly in the past; a token that
        // expires this very second counts as expired here.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(data.claims.sub)
    }
}

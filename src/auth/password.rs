// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Password hashing with argon2.
//!
//! Digests are salted PHC strings; hashing the same input twice yields
//! different digests. Verification never panics: a malformed digest simply
//! fails to verify.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Hash a plaintext password into a salted PHC string.
///
/// # Errors
/// Returns `AuthError::Internal` if the hasher fails (out of memory or
/// invalid parameters); never exposes the plaintext.
pub fn hash(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored digest.
///
/// A digest that does not parse as a PHC string verifies false.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! # Authentication Module
//!
//! Credential handling for the API: argon2 password hashing, JWT bearer
//! tokens, the request extractor that enforces them, and the in-memory
//! email confirmation registry.

pub mod confirmation;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use confirmation::{generate_passcode, ConfirmationRegistry};
pub use error::AuthError;
pub use extractor::{Auth, AuthenticatedUser};
pub use token::TokenIssuer;

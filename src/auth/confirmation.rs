// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Email confirmation passcodes.
//!
//! Registration issues a short numeric passcode per email address, kept in
//! memory only. A passcode is single-use: confirming with it removes the
//! entry, and a failed attempt leaves it in place. Re-registering the same
//! email overwrites any pending entry. Entries do not survive a restart;
//! unconfirmed users simply register again.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;

/// Number of digits in a confirmation passcode.
const PASSCODE_DIGITS: u32 = 6;

/// Generate a uniformly random passcode, zero-padded to a fixed width so
/// every code has the same length regardless of its numeric value.
pub fn generate_passcode() -> String {
    let upper = 10u32.pow(PASSCODE_DIGITS);
    let code = rand::rng().random_range(0..upper);
    format!("{code:06}")
}

/// A passcode waiting to be confirmed.
#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    pub passcode: String,
    pub issued_at: DateTime<Utc>,
}

/// In-memory registry of pending email confirmations, keyed by email.
#[derive(Debug, Default)]
pub struct ConfirmationRegistry {
    pending: HashMap<String, PendingConfirmation>,
}

impl ConfirmationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a passcode for `email`, replacing any pending one.
    pub fn register(&mut self, email: &str, passcode: String) {
        self.pending.insert(
            email.to_string(),
            PendingConfirmation {
                passcode,
                issued_at: Utc::now(),
            },
        );
    }

    /// Attempt to confirm `email` with `passcode`.
    ///
    /// On a match the entry is consumed and `true` is returned. A mismatch or
    /// an unknown email returns `false` and leaves any pending entry intact.
    pub fn confirm(&mut self, email: &str, passcode: &str) -> bool {
        match self.pending.get(email) {
            Some(pending) if pending.passcode == passcode => {
                self.pending.remove(email);
                true
            }
            _ => false,
        }
    }

    /// Whether `email` has a passcode waiting.
    pub fn has_pending(&self, email: &str) -> bool {
        self.pending.contains_key(email)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Shared application state handed to every handler.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{ConfirmationRegistry, TokenIssuer};
use crate::email::Mailer;
use crate::storage::Database;

/// Cloneable handle to everything the handlers need.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenIssuer>,
    pub confirmations: Arc<RwLock<ConfirmationRegistry>>,
    /// Absent when Mailgun is not configured; registration then skips the
    /// confirmation email but still records the passcode.
    pub mailer: Option<Arc<Mailer>>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenIssuer) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            confirmations: Arc::new(RwLock::new(ConfirmationRegistry::new())),
            mailer: None,
        }
    }

    pub fn with_mailer(mut self, mailer: Mailer) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }
}

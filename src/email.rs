// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Outgoing email via the Mailgun HTTP API.

use std::time::Duration;

use crate::config::MailgunSettings;

const MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Mailgun client bound to one sending domain.
pub struct Mailer {
    client: reqwest::Client,
    domain: String,
    api_key: String,
    from_title: String,
    from_email: String,
}

impl Mailer {
    pub fn new(settings: &MailgunSettings) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;

        Ok(Self {
            client,
            domain: settings.domain.clone(),
            api_key: settings.api_key.clone(),
            from_title: settings.from_title.clone(),
            from_email: settings.from_email.clone(),
        })
    }

    /// Send an HTML email to one or more recipients.
    pub async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), EmailError> {
        let url = format!("{MAILGUN_API_BASE}/{}/messages", self.domain);
        let from = format!("{} <{}>", self.from_title, self.from_email);
        let recipients = to.join(",");

        let form = [
            ("from", from.as_str()),
            ("to", recipients.as_str()),
            ("subject", subject),
            ("html", html),
        ];

        self.client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(recipients = to.len(), subject, "email sent");
        Ok(())
    }
}

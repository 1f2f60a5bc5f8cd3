// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Runtime configuration from environment variables.
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | `HOST` | `0.0.0.0` | Listen address |
//! | `PORT` | `8080` | Listen port |
//! | `DATA_DIR` | `/data` | Directory for the embedded database file |
//! | `SECRET_KEY` | required | HMAC secret for signing access tokens |
//! | `ALGORITHM` | `HS256` | Token signing algorithm (HS256/HS384/HS512) |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | `59` | Access token lifetime |
//! | `MAILGUN_DOMAIN` | unset | Mailgun sending domain (enables email) |
//! | `MAILGUN_API_KEY` | unset | Mailgun API key |
//! | `FROM_TITLE` | `SokoFresh` | Display name on outgoing mail |
//! | `FROM_EMAIL` | unset | Sender address for outgoing mail |
//!
//! Email sending is optional: it is enabled only when `MAILGUN_DOMAIN`,
//! `MAILGUN_API_KEY` and `FROM_EMAIL` are all set.

use std::env;
use std::path::PathBuf;

use jsonwebtoken::Algorithm;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Mailgun credentials; present only when email sending is configured.
#[derive(Debug, Clone)]
pub struct MailgunSettings {
    pub domain: String,
    pub api_key: String,
    pub from_title: String,
    pub from_email: String,
}

/// Server settings resolved at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub mailgun: Option<MailgunSettings>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                var: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 8080,
        };

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"));

        let secret_key =
            env::var("SECRET_KEY").map_err(|_| ConfigError::MissingVar("SECRET_KEY"))?;

        let algorithm = match env::var("ALGORITHM") {
            Ok(raw) => parse_algorithm(&raw)?,
            Err(_) => Algorithm::HS256,
        };

        let access_token_expire_minutes = match env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw.parse::<i64>().map_err(|e| ConfigError::InvalidVar {
                var: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: e.to_string(),
            })?,
            Err(_) => 59,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            secret_key,
            algorithm,
            access_token_expire_minutes,
            mailgun: mailgun_from_env(),
        })
    }
}

/// Tokens are HMAC-signed with a shared secret; asymmetric algorithms would
/// need key-pair plumbing this deployment does not have.
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    match raw {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::InvalidVar {
            var: "ALGORITHM",
            reason: format!("unsupported algorithm {other}, expected HS256/HS384/HS512"),
        }),
    }
}

fn mailgun_from_env() -> Option<MailgunSettings> {
    let domain = env::var("MAILGUN_DOMAIN").ok()?;
    let api_key = env::var("MAILGUN_API_KEY").ok()?;
    let from_email = env::var("FROM_EMAIL").ok()?;
    let from_title = env::var("FROM_TITLE").unwrap_or_else(|_| "SokoFresh".to_string());

    Some(MailgunSettings {
        domain,
        api_key,
        from_title,
        from_email,
    })
}

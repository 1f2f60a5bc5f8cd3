// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

use std::net::SocketAddr;

use chrono::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sokofresh_api::api::router;
use sokofresh_api::auth::TokenIssuer;
use sokofresh_api::config::Settings;
use sokofresh_api::email::Mailer;
use sokofresh_api::storage::Database;
use sokofresh_api::AppState;

#[tokio::main]
async fn main() {
    // Defaults to info for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sokofresh_api=info,tower_http=debug".into());

    // JSON logs for deployed environments, plain text locally
    let use_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = use_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!use_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let settings = Settings::from_env().expect("Failed to load configuration");

    let db = Database::open(&settings.data_dir.join("sokofresh.redb"))
        .expect("Failed to open database");
    tracing::info!(data_dir = %settings.data_dir.display(), "database opened");

    let tokens = TokenIssuer::new(
        settings.secret_key.as_bytes(),
        settings.algorithm,
        Some(Duration::minutes(settings.access_token_expire_minutes)),
    );

    let mut state = AppState::new(db, tokens);
    if let Some(mailgun) = &settings.mailgun {
        let mailer = Mailer::new(mailgun).expect("Failed to build email client");
        state = state.with_mailer(mailer);
        tracing::info!(domain = %mailgun.domain, "email sending enabled");
    } else {
        tracing::warn!("Mailgun not configured; confirmation emails disabled");
    }

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .expect("Failed to parse bind address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("SokoFresh API listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("shutdown signal received");
}

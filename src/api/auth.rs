// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};

use crate::{
    auth::{self, generate_passcode},
    error::ApiError,
    models::{ConfirmRequest, LoginForm, RegisterRequest, TokenResponse, UserShow},
    state::AppState,
    storage::{NewUser, StorageError, UserRepository},
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, body = UserShow),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserShow>), ApiError> {
    let password_hash = auth::password::hash(&request.password)?;

    let users = UserRepository::new(&state.db);
    let user = users
        .create(NewUser {
            email: request.email,
            first_name: request.first_name,
            password_hash,
        })
        .map_err(|err| match err {
            StorageError::AlreadyExists(_) => ApiError::conflict("That email is already in use"),
            other => other.into(),
        })?;

    let passcode = generate_passcode();
    state
        .confirmations
        .write()
        .await
        .register(&user.email, passcode.clone());

    if let Some(mailer) = &state.mailer {
        let html = format!(
            "<p>Hello {},</p><p>Your confirmation passcode is <b>{}</b>.</p>",
            user.first_name, passcode
        );
        mailer
            .send(
                std::slice::from_ref(&user.email),
                "Confirm your email address",
                &html,
            )
            .await?;
    }

    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let users = UserRepository::new(&state.db);

    let verified = match users.get_by_email(&form.username)? {
        Some(user) => auth::password::verify(&form.password, &user.password_hash),
        None => {
            // Burn a hash so unknown emails take as long as wrong passwords
            let _ = auth::password::hash(&form.password);
            false
        }
    };

    if !verified {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    let access_token = state.tokens.issue(&form.username)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.ttl().num_seconds(),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/confirm/{user_id}",
    params(("user_id" = u64, Path, description = "User being confirmed")),
    request_body = ConfirmRequest,
    tag = "Auth",
    responses(
        (status = 200, body = UserShow),
        (status = 400, description = "Wrong or stale passcode"),
        (status = 404, description = "No such user")
    )
)]
pub async fn confirm_email(
    Path(user_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<UserShow>, ApiError> {
    let users = UserRepository::new(&state.db);
    let user = users
        .get(user_id)?
        .ok_or_else(|| ApiError::not_found(format!("User {user_id} not found")))?;

    let confirmed = state
        .confirmations
        .write()
        .await
        .confirm(&user.email, &request.passcode);

    if !confirmed {
        return Err(ApiError::bad_request("Invalid confirmation passcode"));
    }

    let user = users.set_confirmed(user.id)?;
    tracing::info!(user_id = user.id, "email confirmed");
    Ok(Json(user.into()))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{MessageResponse, ValueChainPayload, ValueChainShow},
    state::AppState,
    storage::{OwnedLookup, ValueChainRepository},
};

#[utoipa::path(
    post,
    path = "/value_chains",
    request_body = ValueChainPayload,
    tag = "Value chains",
    security(("bearer" = [])),
    responses((status = 201, body = ValueChainShow))
)]
pub async fn create_value_chain(
    auth: Auth,
    State(state): State<AppState>,
    Json(payload): Json<ValueChainPayload>,
) -> Result<(StatusCode, Json<ValueChainShow>), ApiError> {
    let user = super::current_user(&state, &auth)?;

    let chain = ValueChainRepository::new(&state.db).create(user.id, payload.name)?;
    Ok((StatusCode::CREATED, Json(chain.into())))
}

#[utoipa::path(
    put,
    path = "/value_chains/{chain_id}",
    params(("chain_id" = u64, Path, description = "Value chain to rename")),
    request_body = ValueChainPayload,
    tag = "Value chains",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ValueChainShow),
        (status = 404, description = "No such value chain for this user")
    )
)]
pub async fn update_value_chain(
    auth: Auth,
    Path(chain_id): Path<u64>,
    State(state): State<AppState>,
    Json(payload): Json<ValueChainPayload>,
) -> Result<Json<ValueChainShow>, ApiError> {
    let user = super::current_user(&state, &auth)?;

    let chains = ValueChainRepository::new(&state.db);
    chains.get(chain_id)?.owned_by(user.id, "Value chain")?;

    let updated = chains.update(chain_id, payload.name)?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/value_chains/{chain_id}",
    params(("chain_id" = u64, Path, description = "Value chain to remove")),
    tag = "Value chains",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "No such value chain for this user")
    )
)]
pub async fn delete_value_chain(
    auth: Auth,
    Path(chain_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = super::current_user(&state, &auth)?;

    let chains = ValueChainRepository::new(&state.db);
    chains.get(chain_id)?.owned_by(user.id, "Value chain")?;
    chains.delete(chain_id)?;

    Ok(Json(MessageResponse::new("Value chain deleted")))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{AddressCreate, AddressShow, MessageResponse, UserDetailsShow, UserShow, UserUpdate},
    state::AppState,
    storage::{
        AddressFields, AddressRepository, OwnedLookup, ProfileChanges, UserRepository,
        ValueChainRepository,
    },
};

#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    /// Number of users to skip from the start of the listing
    pub skip: Option<usize>,
    /// Maximum number of users to return
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/users",
    params(Pagination),
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, body = [UserShow]))
)]
pub async fn list_users(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<UserShow>>, ApiError> {
    let users = UserRepository::new(&state.db);
    let page = users.list(
        pagination.skip.unwrap_or(0),
        pagination.limit.unwrap_or(100),
    )?;
    Ok(Json(page.into_iter().map(UserShow::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, body = UserDetailsShow))
)]
pub async fn get_current_user(
    auth: Auth,
    State(state): State<AppState>,
) -> Result<Json<UserDetailsShow>, ApiError> {
    let user = super::current_user(&state, &auth)?;

    let addresses = AddressRepository::new(&state.db).list_by_user(user.id)?;
    let value_chains = ValueChainRepository::new(&state.db).list_by_user(user.id)?;

    Ok(Json(UserDetailsShow {
        user: user.into(),
        addresses: addresses.into_iter().map(Into::into).collect(),
        value_chains: value_chains.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = u64, Path, description = "User to fetch")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserShow),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    Auth(_caller): Auth,
    Path(user_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<UserShow>, ApiError> {
    let user = UserRepository::new(&state.db)
        .get(user_id)?
        .ok_or_else(|| ApiError::not_found(format!("User {user_id} not found")))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/users",
    request_body = UserUpdate,
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, body = UserShow))
)]
pub async fn update_user(
    auth: Auth,
    State(state): State<AppState>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserShow>, ApiError> {
    let user = super::current_user(&state, &auth)?;

    let updated = UserRepository::new(&state.db).update_profile(
        user.id,
        ProfileChanges {
            first_name: update.first_name,
            middle_name: update.middle_name,
            last_name: update.last_name,
            dob: update.dob,
            nationality: update.nationality,
            phone_number: update.phone_number,
        },
    )?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, body = MessageResponse))
)]
pub async fn delete_user(
    auth: Auth,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = super::current_user(&state, &auth)?;
    UserRepository::new(&state.db).delete(user.id)?;
    tracing::info!(user_id = user.id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted")))
}

#[utoipa::path(
    post,
    path = "/users/address",
    request_body = AddressCreate,
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 201, body = AddressShow))
)]
pub async fn create_address(
    auth: Auth,
    State(state): State<AppState>,
    Json(request): Json<AddressCreate>,
) -> Result<(StatusCode, Json<AddressShow>), ApiError> {
    let user = super::current_user(&state, &auth)?;

    let address = AddressRepository::new(&state.db).create(
        user.id,
        AddressFields {
            country: request.country,
            city: request.city,
            state: request.state,
            province: request.province,
            zip: request.zip,
        },
    )?;
    Ok((StatusCode::CREATED, Json(address.into())))
}

#[utoipa::path(
    put,
    path = "/users/address/{address_id}",
    params(("address_id" = u64, Path, description = "Address to replace")),
    request_body = AddressCreate,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AddressShow),
        (status = 404, description = "No such address for this user")
    )
)]
pub async fn update_address(
    auth: Auth,
    Path(address_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<AddressCreate>,
) -> Result<Json<AddressShow>, ApiError> {
    let user = super::current_user(&state, &auth)?;

    let addresses = AddressRepository::new(&state.db);
    addresses.get(address_id)?.owned_by(user.id, "Address")?;

    let updated = addresses.update(
        address_id,
        AddressFields {
            country: request.country,
            city: request.city,
            state: request.state,
            province: request.province,
            zip: request.zip,
        },
    )?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/users/address/{address_id}",
    params(("address_id" = u64, Path, description = "Address to remove")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "No such address for this user")
    )
)]
pub async fn delete_address(
    auth: Auth,
    Path(address_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = super::current_user(&state, &auth)?;

    let addresses = AddressRepository::new(&state.db);
    addresses.get(address_id)?.owned_by(user.id, "Address")?;
    addresses.delete(address_id)?;

    Ok(Json(MessageResponse::new("Address deleted")))
}

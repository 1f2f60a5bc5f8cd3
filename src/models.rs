// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Request and response bodies for the HTTP API.
//!
//! Storage records never cross the wire directly; each response type maps
//! its fields explicitly so a new stored field cannot leak by accident
//! (the password hash in particular).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{StoredAddress, StoredUser, StoredValueChain};

/// Body for `POST /auth/register`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub first_name: String,
    pub email: String,
    pub password: String,
}

/// Form body for `POST /auth/login`.
///
/// Field names follow the OAuth2 password grant convention: `username`
/// carries the email address.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`
    pub token_type: String,
    /// Lifetime of the token in seconds
    pub expires_in: i64,
}

/// Body for `POST /auth/confirm/{user_id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmRequest {
    pub passcode: String,
}

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserShow {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub confirmed: bool,
    pub time_created: DateTime<Utc>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl From<StoredUser> for UserShow {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            middle_name: user.middle_name,
            last_name: user.last_name,
            dob: user.dob,
            phone_number: user.phone_number,
            nationality: user.nationality,
            confirmed: user.confirmed,
            time_created: user.time_created,
            time_updated: user.time_updated,
        }
    }
}

/// Body for `PUT /users`. Every field is optional; absent fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub phone_number: Option<String>,
}

/// Profile plus owned records, returned by `GET /users/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDetailsShow {
    #[serde(flatten)]
    pub user: UserShow,
    pub addresses: Vec<AddressShow>,
    pub value_chains: Vec<ValueChainShow>,
}

/// Body for `POST /users/address` and `PUT /users/address/{address_id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressCreate {
    pub country: String,
    pub city: String,
    pub state: String,
    pub province: String,
    pub zip: i32,
}

/// Public view of an address.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressShow {
    pub id: u64,
    pub user_id: u64,
    pub country: String,
    pub city: String,
    pub state: String,
    pub province: String,
    pub zip: i32,
    pub time_created: DateTime<Utc>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl From<StoredAddress> for AddressShow {
    fn from(address: StoredAddress) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id,
            country: address.country,
            city: address.city,
            state: address.state,
            province: address.province,
            zip: address.zip,
            time_created: address.time_created,
            time_updated: address.time_updated,
        }
    }
}

/// Body for `POST /value_chains` and `PUT /value_chains/{chain_id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValueChainPayload {
    pub name: String,
}

/// Public view of a value chain.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValueChainShow {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl From<StoredValueChain> for ValueChainShow {
    fn from(chain: StoredValueChain) -> Self {
        Self {
            id: chain.id,
            user_id: chain.user_id,
            name: chain.name,
            time_created: chain.time_created,
            time_updated: chain.time_updated,
        }
    }
}

/// Generic `{"message": ...}` body for operations with nothing else to say.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_user() -> StoredUser {
        StoredUser {
            id: 1,
            email: "u@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Amina".to_string(),
            middle_name: None,
            last_name: Some("Odhiambo".to_string()),
            dob: None,
            phone_number: Some("+254700000000".to_string()),
            nationality: Some("Kenyan".to_string()),
            confirmed: true,
            time_created: Utc::now(),
            time_updated: None,
        }
    }

    #[test]
    fn user_show_never_serializes_the_password_hash() {
        let show = UserShow::from(stored_user());
        let json = serde_json::to_string(&show).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn user_details_flatten_profile_fields() {
        let details = UserDetailsShow {
            user: UserShow::from(stored_user()),
            addresses: vec![],
            value_chains: vec![],
        };
        let json: serde_json::Value = serde_json::to_value(&details).unwrap();
        // Profile fields sit at the top level next to the owned collections
        assert_eq!(json["email"], "u@x.com");
        assert!(json["addresses"].as_array().unwrap().is_empty());
        assert!(json["value_chains"].as_array().unwrap().is_empty());
    }
}

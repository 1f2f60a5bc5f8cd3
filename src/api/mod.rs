// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! # HTTP API Module
//!
//! Route table, OpenAPI document and the handlers themselves, one file per
//! resource. All `/users` and `/value_chains` routes require a bearer token;
//! the `/auth` routes and the root greeting do not.

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        AddressCreate, AddressShow, ConfirmRequest, LoginForm, MessageResponse, RegisterRequest,
        TokenResponse, UserDetailsShow, UserShow, UserUpdate, ValueChainPayload, ValueChainShow,
    },
    state::AppState,
    storage::{StoredUser, UserRepository},
};

pub mod auth;
pub mod users;
pub mod value_chains;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(root))
        .route("/auth/register", post(auth::register_user))
        .route("/auth/login", post(auth::login))
        .route("/auth/confirm/{user_id}", post(auth::confirm_email))
        .route(
            "/users",
            get(users::list_users)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/me", get(users::get_current_user))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/address", post(users::create_address))
        .route(
            "/users/address/{address_id}",
            put(users::update_address).delete(users::delete_address),
        )
        .route("/value_chains", post(value_chains::create_value_chain))
        .route(
            "/value_chains/{chain_id}",
            put(value_chains::update_value_chain).delete(value_chains::delete_value_chain),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Meta",
    responses((status = 200, body = MessageResponse))
)]
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Hello, welcome to the SokoFresh user management API",
    ))
}

/// Resolve the token subject to a stored user.
///
/// A verified token whose subject no longer exists (deleted account) gets
/// the same opaque 401 as a bad token: same body, same challenge header.
pub(crate) fn current_user(state: &AppState, auth: &Auth) -> Result<StoredUser, ApiError> {
    UserRepository::new(&state.db)
        .get_by_email(&auth.0.email)?
        .ok_or_else(|| crate::auth::AuthError::InvalidCredentials.into())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        auth::register_user,
        auth::login,
        auth::confirm_email,
        users::list_users,
        users::get_current_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::create_address,
        users::update_address,
        users::delete_address,
        value_chains::create_value_chain,
        value_chains::update_value_chain,
        value_chains::delete_value_chain
    ),
    components(
        schemas(
            RegisterRequest,
            LoginForm,
            TokenResponse,
            ConfirmRequest,
            UserShow,
            UserUpdate,
            UserDetailsShow,
            AddressCreate,
            AddressShow,
            ValueChainPayload,
            ValueChainShow,
            MessageResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Meta", description = "Service information"),
        (name = "Auth", description = "Registration, login and email confirmation"),
        (name = "Users", description = "Profile and address management"),
        (name = "Value chains", description = "Produce line management")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use jsonwebtoken::Algorithm;
    use tower::ServiceExt;

    use crate::auth::{password, AuthenticatedUser, TokenIssuer};
    use crate::storage::{Database, NewUser};

    pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        let tokens = TokenIssuer::new(b"api-test-secret", Algorithm::HS256, None);
        (AppState::new(db, tokens), dir)
    }

    /// Create a user directly in storage and hand back their identity, the
    /// way the extractor would after verifying a token.
    pub(crate) async fn register(state: &AppState, email: &str) -> Auth {
        UserRepository::new(&state.db)
            .create(NewUser {
                email: email.to_string(),
                first_name: "Amina".to_string(),
                password_hash: password::hash("hunter22").unwrap(),
            })
            .unwrap();
        Auth(AuthenticatedUser {
            email: email.to_string(),
        })
    }

    pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_greets_without_auth() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["message"],
            "Hello, welcome to the SokoFresh user management API"
        );
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401_with_challenge() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[tokio::test]
    async fn register_login_and_use_token_end_to_end() {
        let (state, _dir) = test_state();
        let app = router(state);

        let register_body = serde_json::json!({
            "first_name": "Amina",
            "email": "amina@x.com",
            "password": "hunter22"
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(register_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["email"], "amina@x.com");
        assert_eq!(created["confirmed"], false);
        assert!(created.get("password_hash").is_none());

        // Duplicate registration conflicts
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(register_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Login with form-encoded credentials
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=amina%40x.com&password=hunter22"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token_body = body_json(response).await;
        assert_eq!(token_body["token_type"], "bearer");
        let token = token_body["access_token"].as_str().unwrap().to_string();

        // The token opens protected routes
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let me = body_json(response).await;
        assert_eq!(me["email"], "amina@x.com");
        let user_id = me["id"].as_u64().unwrap();

        // The listing contains the new user exactly once
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listing = body_json(response).await;
        let matches = listing
            .as_array()
            .unwrap()
            .iter()
            .filter(|u| u["email"] == "amina@x.com")
            .count();
        assert_eq!(matches, 1);

        // Delete the account, then the same token is dead
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/users")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // A surviving account sees the deleted user's id as gone
        let other = {
            let body = serde_json::json!({
                "first_name": "Ben",
                "email": "ben@x.com",
                "password": "hunter22"
            });
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/auth/register")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);

            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/auth/login")
                        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                        .body(Body::from("username=ben%40x.com&password=hunter22"))
                        .unwrap(),
                )
                .await
                .unwrap();
            let json = body_json(response).await;
            json["access_token"].as_str().unwrap().to_string()
        };

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/users/{user_id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {other}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_rejections_share_one_body() {
        let (state, _dir) = test_state();
        register(&state, "amina@x.com").await;
        let app = router(state);

        let attempt = |body: &'static str| {
            let app = app.clone();
            async move {
                let response = app
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/auth/login")
                            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                            .body(Body::from(body))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
                body_json(response).await
            }
        };

        let wrong_password = attempt("username=amina%40x.com&password=wrong").await;
        let unknown_email = attempt("username=ghost%40x.com&password=hunter22").await;
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/auth/register"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}

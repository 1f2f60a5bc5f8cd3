// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! SokoFresh user management API.
//!
//! A JSON HTTP service for farmer accounts: registration with email
//! confirmation, password login issuing JWT bearer tokens, profile and
//! address management, and the value chains (produce lines) each user runs.
//!
//! - [`api`] — route table, OpenAPI document and handlers
//! - [`auth`] — password hashing, bearer tokens, confirmation passcodes
//! - [`storage`] — embedded redb persistence and ownership checks
//! - [`email`] — Mailgun delivery for confirmation passcodes

pub mod api;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

pub use state::AppState;

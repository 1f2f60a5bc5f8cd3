// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! # Entity Storage Module
//!
//! Persistence for users, addresses and value chains, backed by an embedded
//! redb database. Each repository performs plain CRUD; ownership checks sit
//! in [`ownership`] and are applied by the API layer before any mutation.
//!
//! Each API invocation opens its own short-lived transaction and releases it
//! on every exit path (transactions abort on drop). A single logical
//! operation never spans more than one transaction, so check-then-mutate
//! flows that read and write in the same repository call are atomic.

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{Database, StorageError, StorageResult};
pub use ownership::{OwnedLookup, OwnedResource};
pub use repository::{
    AddressFields, AddressRepository, NewUser, ProfileChanges, StoredAddress, StoredUser,
    StoredValueChain, UserRepository, ValueChainRepository,
};

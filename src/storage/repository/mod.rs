// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Entity repositories over the embedded database.

pub mod addresses;
pub mod users;
pub mod value_chains;

pub use addresses::{AddressFields, AddressRepository, StoredAddress};
pub use users::{NewUser, ProfileChanges, StoredUser, UserRepository};
pub use value_chains::{StoredValueChain, ValueChainRepository};

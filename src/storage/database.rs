// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Embedded entity store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `user_emails`: email → user_id (uniqueness index, case-sensitive)
//! - `addresses`: address_id → serialized StoredAddress
//! - `value_chains`: chain_id → serialized StoredValueChain
//! - `counters`: counter name → last allocated id
//!
//! Records are serialized as JSON bytes. Surrogate ids are allocated from the
//! `counters` table inside the same write transaction as the insert, so an id
//! is never handed out without its row.

use std::path::Path;

use redb::{ReadableDatabase, ReadableTable, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Uniqueness index: email → user_id. Emails are compared byte-for-byte;
/// no case normalization is applied.
pub(crate) const USER_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("user_emails");

/// Primary table: address_id → serialized StoredAddress (JSON bytes).
pub(crate) const ADDRESSES: TableDefinition<u64, &[u8]> = TableDefinition::new("addresses");

/// Primary table: chain_id → serialized StoredValueChain (JSON bytes).
pub(crate) const VALUE_CHAINS: TableDefinition<u64, &[u8]> = TableDefinition::new("value_chains");

/// Id allocation: counter name → last allocated id.
pub(crate) const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

pub(crate) const USER_COUNTER: &str = "users";
pub(crate) const ADDRESS_COUNTER: &str = "addresses";
pub(crate) const VALUE_CHAIN_COUNTER: &str = "value_chains";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID entity database shared by all repositories.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(ADDRESSES)?;
            let _ = write_txn.open_table(VALUE_CHAINS)?;
            let _ = write_txn.open_table(COUNTERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StorageResult<redb::WriteTransaction> {
        Ok(self.db.begin_write()?)
    }
}

/// Allocate the next id for `counter` within the caller's write transaction.
pub(crate) fn next_id(txn: &redb::WriteTransaction, counter: &str) -> StorageResult<u64> {
    let mut table = txn.open_table(COUNTERS)?;
    let id = table.get(counter)?.map(|guard| guard.value()).unwrap_or(0) + 1;
    table.insert(counter, id)?;
    Ok(id)
}

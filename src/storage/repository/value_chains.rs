// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Value chain repository.
//!
//! A value chain is a named produce line (e.g. "Avocados") owned by one user.
//! Same ownership discipline as addresses.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{next_id, Database, VALUE_CHAINS, VALUE_CHAIN_COUNTER};
use super::super::{OwnedResource, StorageError, StorageResult};

/// Value chain record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredValueChain {
    /// Unique value chain id
    pub id: u64,
    /// Owning user's id
    pub user_id: u64,
    pub name: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl OwnedResource for StoredValueChain {
    fn owner_user_id(&self) -> u64 {
        self.user_id
    }
}

/// Repository for value chain CRUD operations.
pub struct ValueChainRepository<'a> {
    db: &'a Database,
}

impl<'a> ValueChainRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new value chain owned by `user_id`.
    pub fn create(&self, user_id: u64, name: String) -> StorageResult<StoredValueChain> {
        let write_txn = self.db.begin_write()?;
        let chain = {
            let id = next_id(&write_txn, VALUE_CHAIN_COUNTER)?;
            let chain = StoredValueChain {
                id,
                user_id,
                name,
                time_created: Utc::now(),
                time_updated: None,
            };
            let mut table = write_txn.open_table(VALUE_CHAINS)?;
            table.insert(id, serde_json::to_vec(&chain)?.as_slice())?;
            chain
        };
        write_txn.commit()?;
        Ok(chain)
    }

    /// Get a value chain by id.
    pub fn get(&self, chain_id: u64) -> StorageResult<Option<StoredValueChain>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VALUE_CHAINS)?;
        match table.get(chain_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Rename an existing value chain. The owner reference is preserved.
    pub fn update(&self, chain_id: u64, name: String) -> StorageResult<StoredValueChain> {
        let write_txn = self.db.begin_write()?;
        let chain = {
            let mut table = write_txn.open_table(VALUE_CHAINS)?;

            let existing_bytes = {
                let existing = table
                    .get(chain_id)?
                    .ok_or_else(|| StorageError::NotFound(format!("Value chain {chain_id}")))?;
                existing.value().to_vec()
            };

            let mut chain: StoredValueChain = serde_json::from_slice(&existing_bytes)?;
            chain.name = name;
            chain.time_updated = Some(Utc::now());

            table.insert(chain_id, serde_json::to_vec(&chain)?.as_slice())?;
            chain
        };
        write_txn.commit()?;
        Ok(chain)
    }

    /// Delete a value chain.
    pub fn delete(&self, chain_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(VALUE_CHAINS)?;
            if table.remove(chain_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Value chain {chain_id}")));
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// List all value chains owned by a user.
    pub fn list_by_user(&self, user_id: u64) -> StorageResult<Vec<StoredValueChain>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VALUE_CHAINS)?;

        let mut chains = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let chain: StoredValueChain = serde_json::from_slice(value.value())?;
            if chain.user_id == user_id {
                chains.push(chain);
            }
        }
        Ok(chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    #[test]
    fn create_update_delete_roundtrip() {
        let (db, _dir) = temp_db();
        let repo = ValueChainRepository::new(&db);

        let chain = repo.create(1, "Avocados".to_string()).unwrap();
        assert_eq!(chain.id, 1);
        assert_eq!(chain.name, "Avocados");

        let renamed = repo.update(chain.id, "Mangos".to_string()).unwrap();
        assert_eq!(renamed.id, 1);
        assert_eq!(renamed.user_id, 1);
        assert_eq!(renamed.name, "Mangos");

        repo.delete(chain.id).unwrap();
        assert!(repo.get(chain.id).unwrap().is_none());
    }

    #[test]
    fn list_by_user_filters_by_owner() {
        let (db, _dir) = temp_db();
        let repo = ValueChainRepository::new(&db);

        repo.create(1, "Avocados".to_string()).unwrap();
        repo.create(2, "Tea".to_string()).unwrap();
        repo.create(1, "Coffee".to_string()).unwrap();

        let owned = repo.list_by_user(1).unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|c| c.user_id == 1));
    }

    #[test]
    fn update_and_delete_missing_chain_errors() {
        let (db, _dir) = temp_db();
        let repo = ValueChainRepository::new(&db);

        assert!(matches!(
            repo.update(9, "x".to_string()),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(repo.delete(9), Err(StorageError::NotFound(_))));
    }
}

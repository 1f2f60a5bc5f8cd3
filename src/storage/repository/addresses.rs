// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Address repository.
//!
//! Every address belongs to exactly one user. The owner reference is set at
//! creation from the authenticated session and never changes on update.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{next_id, Database, ADDRESSES, ADDRESS_COUNTER};
use super::super::{OwnedResource, StorageError, StorageResult};

/// Address record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAddress {
    /// Unique address id
    pub id: u64,
    /// Owning user's id
    pub user_id: u64,
    pub country: String,
    pub city: String,
    pub state: String,
    pub province: String,
    pub zip: i32,
    pub time_created: DateTime<Utc>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl OwnedResource for StoredAddress {
    fn owner_user_id(&self) -> u64 {
        self.user_id
    }
}

/// Location fields of an address, mapped explicitly from the request shape.
#[derive(Debug, Clone)]
pub struct AddressFields {
    pub country: String,
    pub city: String,
    pub state: String,
    pub province: String,
    pub zip: i32,
}

/// Repository for address CRUD operations.
pub struct AddressRepository<'a> {
    db: &'a Database,
}

impl<'a> AddressRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new address owned by `user_id`.
    pub fn create(&self, user_id: u64, fields: AddressFields) -> StorageResult<StoredAddress> {
        let write_txn = self.db.begin_write()?;
        let address = {
            let id = next_id(&write_txn, ADDRESS_COUNTER)?;
            let address = StoredAddress {
                id,
                user_id,
                country: fields.country,
                city: fields.city,
                state: fields.state,
                province: fields.province,
                zip: fields.zip,
                time_created: Utc::now(),
                time_updated: None,
            };
            let mut table = write_txn.open_table(ADDRESSES)?;
            table.insert(id, serde_json::to_vec(&address)?.as_slice())?;
            address
        };
        write_txn.commit()?;
        Ok(address)
    }

    /// Get an address by id.
    pub fn get(&self, address_id: u64) -> StorageResult<Option<StoredAddress>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ADDRESSES)?;
        match table.get(address_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Replace the location fields of an existing address. The owner
    /// reference is preserved.
    pub fn update(&self, address_id: u64, fields: AddressFields) -> StorageResult<StoredAddress> {
        let write_txn = self.db.begin_write()?;
        let address = {
            let mut table = write_txn.open_table(ADDRESSES)?;

            let existing_bytes = {
                let existing = table
                    .get(address_id)?
                    .ok_or_else(|| StorageError::NotFound(format!("Address {address_id}")))?;
                existing.value().to_vec()
            };

            let mut address: StoredAddress = serde_json::from_slice(&existing_bytes)?;
            address.country = fields.country;
            address.city = fields.city;
            address.state = fields.state;
            address.province = fields.province;
            address.zip = fields.zip;
            address.time_updated = Some(Utc::now());

            table.insert(address_id, serde_json::to_vec(&address)?.as_slice())?;
            address
        };
        write_txn.commit()?;
        Ok(address)
    }

    /// Delete an address.
    pub fn delete(&self, address_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ADDRESSES)?;
            if table.remove(address_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Address {address_id}")));
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// List all addresses owned by a user.
    pub fn list_by_user(&self, user_id: u64) -> StorageResult<Vec<StoredAddress>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ADDRESSES)?;

        let mut addresses = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let address: StoredAddress = serde_json::from_slice(value.value())?;
            if address.user_id == user_id {
                addresses.push(address);
            }
        }
        Ok(addresses)
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

    fn nairobi() -> AddressFields {
        AddressFields {
            country: "Kenya".to_string(),
            city: "Nairobi".to_string(),
            state: String::new(),
            province: "Province".to_string(),
            zip: 50089,
        }
    }

    #[test]
    fn create_get_update_delete_roundtrip() {
        let (db, _dir) = temp_db();
        let repo = AddressRepository::new(&db);

        let address = repo.create(1, nairobi()).unwrap();
        assert_eq!(address.id, 1);
        assert_eq!(address.user_id, 1);
        assert_eq!(address.city, "Nairobi");
        assert_eq!(address.zip, 50089);

        let updated = repo
            .update(
                address.id,
                AddressFields {
                    country: "Uganda".to_string(),
                    city: "Kampala".to_string(),
                    state: "Uganda".to_string(),
                    province: "Province".to_string(),
                    zip: 79689,
                },
            )
            .unwrap();
        assert_eq!(updated.city, "Kampala");
        assert_eq!(updated.zip, 79689);
        // Owner survives the update
        assert_eq!(updated.user_id, 1);
        assert!(updated.time_updated.is_some());

        repo.delete(address.id).unwrap();
        assert!(repo.get(address.id).unwrap().is_none());
    }

    #[test]
    fn list_by_user_filters_by_owner() {
        let (db, _dir) = temp_db();
        let repo = AddressRepository::new(&db);

        repo.create(1, nairobi()).unwrap();
        repo.create(1, nairobi()).unwrap();
        repo.create(2, nairobi()).unwrap();

        assert_eq!(repo.list_by_user(1).unwrap().len(), 2);
        assert_eq!(repo.list_by_user(2).unwrap().len(), 1);
        assert!(repo.list_by_user(3).unwrap().is_empty());
    }

    #[test]
    fn update_and_delete_missing_address_errors() {
        let (db, _dir) = temp_db();
        let repo = AddressRepository::new(&db);

        assert!(matches!(
            repo.update(42, nairobi()),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(repo.delete(42), Err(StorageError::NotFound(_))));
    }
}

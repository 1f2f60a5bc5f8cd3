// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! User repository.
//!
//! Users are keyed by an integer surrogate id. Email uniqueness is enforced
//! through the `user_emails` index table, written in the same transaction as
//! the user row. Email comparison is byte-for-byte; `A@x.com` and `a@x.com`
//! are different users.

use chrono::{DateTime, NaiveDate, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{next_id, Database, USERS, USER_COUNTER, USER_EMAILS};
use super::super::{StorageError, StorageResult};

/// User record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user id
    pub id: u64,
    /// Email address (unique, case-sensitive)
    pub email: String,
    /// Salted argon2 digest of the password. The plaintext is never stored.
    pub password_hash: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    /// Date of birth
    pub dob: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    /// Whether the email address has been confirmed
    pub confirmed: bool,
    pub time_created: DateTime<Utc>,
    pub time_updated: Option<DateTime<Utc>>,
}

/// Fields required to create a user. The password arrives pre-hashed;
/// this layer never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub password_hash: String,
}

/// Profile fields a user may change after registration. Email and password
/// are deliberately excluded. `None` leaves the stored value as is; there is
/// no way to clear a field back to empty.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub phone_number: Option<String>,
}

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new user.
    ///
    /// # Errors
    /// Returns `StorageError::AlreadyExists` if the email is taken.
    pub fn create(&self, new: NewUser) -> StorageResult<StoredUser> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(new.email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "User with email {}",
                    new.email
                )));
            }

            let id = next_id(&write_txn, USER_COUNTER)?;
            let user = StoredUser {
                id,
                email: new.email,
                password_hash: new.password_hash,
                first_name: new.first_name,
                middle_name: None,
                last_name: None,
                dob: None,
                phone_number: None,
                nationality: None,
                confirmed: false,
                time_created: Utc::now(),
                time_updated: None,
            };

            emails.insert(user.email.as_str(), id)?;
            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, serde_json::to_vec(&user)?.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Get a user by id.
    pub fn get(&self, user_id: u64) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a user by email (exact match).
    pub fn get_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let user_id = match emails.get(email)? {
            Some(value) => value.value(),
            None => return Ok(None),
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Paginated listing of users in id order.
    pub fn list(&self, skip: usize, limit: usize) -> StorageResult<Vec<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let mut users = Vec::new();
        for entry in table.iter()?.skip(skip) {
            if users.len() >= limit {
                break;
            }
            let (_, value) = entry?;
            users.push(serde_json::from_slice(value.value())?);
        }
        Ok(users)
    }

    /// Update profile fields, leaving email, password and confirmation alone.
    pub fn update_profile(
        &self,
        user_id: u64,
        changes: ProfileChanges,
    ) -> StorageResult<StoredUser> {
        self.modify(user_id, |user| {
            if let Some(first_name) = changes.first_name {
                user.first_name = first_name;
            }
            if changes.middle_name.is_some() {
                user.middle_name = changes.middle_name;
            }
            if changes.last_name.is_some() {
                user.last_name = changes.last_name;
            }
            if changes.dob.is_some() {
                user.dob = changes.dob;
            }
            if changes.nationality.is_some() {
                user.nationality = changes.nationality;
            }
            if changes.phone_number.is_some() {
                user.phone_number = changes.phone_number;
            }
        })
    }

    /// Mark a user's email as confirmed.
    pub fn set_confirmed(&self, user_id: u64) -> StorageResult<StoredUser> {
        self.modify(user_id, |user| {
            user.confirmed = true;
        })
    }

    /// Delete a user and their email index entry.
    ///
    /// Child addresses and value chains are not cascaded; deletes of those
    /// are explicit operations.
    pub fn delete(&self, user_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let removed = {
                let mut users = write_txn.open_table(USERS)?;
                // Bind the guard so it drops before the table handle
                let guard = users.remove(user_id)?;
                match guard {
                    Some(guard) => serde_json::from_slice::<StoredUser>(guard.value())?,
                    None => return Err(StorageError::NotFound(format!("User {user_id}"))),
                }
            };
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            emails.remove(removed.email.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Read-modify-write a user row inside one write transaction.
    fn modify(
        &self,
        user_id: u64,
        apply: impl FnOnce(&mut StoredUser),
    ) -> StorageResult<StoredUser> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut table = write_txn.open_table(USERS)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = table
                    .get(user_id)?
                    .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))?;
                existing.value().to_vec()
            };

            let mut user: StoredUser = serde_json::from_slice(&existing_bytes)?;
            apply(&mut user);
            user.time_updated = Some(Utc::now());

            table.insert(user_id, serde_json::to_vec(&user)?.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
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

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            password_hash: "$argon2$fake".to_string(),
        }
    }

    #[test]
    fn create_and_get_user() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let user = repo.create(new_user("test@test.com")).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "Test");
        assert!(!user.confirmed);

        let loaded = repo.get(1).unwrap().unwrap();
        assert_eq!(loaded, user);

        let by_email = repo.get_by_email("test@test.com").unwrap().unwrap();
        assert_eq!(by_email.id, 1);
    }

    #[test]
    fn duplicate_email_conflicts() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        repo.create(new_user("dup@test.com")).unwrap();
        let mut second = new_user("dup@test.com");
        second.first_name = "Other".to_string();

        let result = repo.create(second);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn email_comparison_is_case_sensitive() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        repo.create(new_user("Case@test.com")).unwrap();
        // Differently-cased email is a distinct user
        let second = repo.create(new_user("case@test.com")).unwrap();
        assert_eq!(second.id, 2);

        assert!(repo.get_by_email("CASE@test.com").unwrap().is_none());
    }

    #[test]
    fn list_paginates_in_id_order() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        for i in 1..=5 {
            repo.create(new_user(&format!("user{i}@test.com"))).unwrap();
        }

        let page = repo.list(0, 3).unwrap();
        assert_eq!(
            page.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let page = repo.list(3, 100).unwrap();
        assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn update_profile_sets_fields_and_timestamp() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let user = repo.create(new_user("profile@test.com")).unwrap();
        assert!(user.time_updated.is_none());

        let updated = repo
            .update_profile(
                user.id,
                ProfileChanges {
                    last_name: Some("Doe".to_string()),
                    dob: NaiveDate::from_ymd_opt(1990, 4, 2),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.last_name.as_deref(), Some("Doe"));
        assert!(updated.time_updated.is_some());
        // Omitted fields survive
        assert_eq!(updated.first_name, "Test");
        assert_eq!(updated.email, "profile@test.com");
        assert_eq!(updated.password_hash, "$argon2$fake");
    }

    #[test]
    fn set_confirmed_flips_flag() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let user = repo.create(new_user("confirm@test.com")).unwrap();
        let confirmed = repo.set_confirmed(user.id).unwrap();
        assert!(confirmed.confirmed);
    }

    #[test]
    fn delete_frees_the_email_for_reuse() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        let user = repo.create(new_user("reuse@test.com")).unwrap();
        repo.delete(user.id).unwrap();

        assert!(repo.get(user.id).unwrap().is_none());
        assert!(repo.get_by_email("reuse@test.com").unwrap().is_none());

        // Same email registers again with a fresh id
        let again = repo.create(new_user("reuse@test.com")).unwrap();
        assert_ne!(again.id, user.id);
    }

    #[test]
    fn missing_user_errors() {
        let (db, _dir) = temp_db();
        let repo = UserRepository::new(&db);

        assert!(repo.get(99).unwrap().is_none());
        assert!(matches!(
            repo.delete(99),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            repo.set_confirmed(99),
            Err(StorageError::NotFound(_))
        ));
    }
}

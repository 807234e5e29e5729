// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 OPD Predict

//! Durable single-slot token storage.
//!
//! The client holds at most one session token at a time. [`TokenStore`] is
//! the injectable capability around that slot; [`SessionDb`] persists it in
//! an embedded redb database so the session survives restarts, and
//! [`MemoryTokenStore`] gives tests an explicit per-test lifecycle.

use std::path::Path;
use std::sync::Mutex;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

/// Single table holding the session slot.
const SESSION: TableDefinition<&str, &str> = TableDefinition::new("session");

/// The one fixed key; absence of this key means `Anonymous`.
const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

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
}

/// Single-slot holder of the current session token.
///
/// `save` overwrites unconditionally (last writer wins), `remove` is
/// idempotent. No decoding happens at this layer.
pub trait TokenStore: Send + Sync {
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn get(&self) -> Result<Option<String>, StoreError>;
    fn remove(&self) -> Result<(), StoreError>;
}

/// Durable token slot backed by redb.
pub struct SessionDb {
    db: Database,
}

impl SessionDb {
    /// Open (or create) the session database at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;
        Ok(Self { db })
    }
}

impl TokenStore for SessionDb {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SESSION)?;
            table.insert(TOKEN_KEY, token)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(SESSION) {
            Ok(table) => table,
            // Nothing was ever saved: the table itself does not exist yet.
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(table.get(TOKEN_KEY)?.map(|guard| guard.value().to_string()))
    }

    fn remove(&self) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SESSION)?;
            table.remove(TOKEN_KEY)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// In-memory token slot for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_db(dir: &TempDir) -> SessionDb {
        SessionDb::open(dir.path().join("session.redb")).expect("open session db")
    }

    #[test]
    fn save_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = open_db(&dir);
        store.save("tok-123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-123"));
    }

    #[test]
    fn fresh_database_has_no_token() {
        let dir = TempDir::new().unwrap();
        let store = open_db(&dir);
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn save_overwrites_previous_token() {
        let dir = TempDir::new().unwrap();
        let store = open_db(&dir);
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = open_db(&dir);
        store.remove().unwrap();
        store.save("tok").unwrap();
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn token_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.redb");
        {
            let store = SessionDb::open(&path).unwrap();
            store.save("durable").unwrap();
        }
        let store = SessionDb::open(&path).unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("durable"));
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state").join("session.redb");
        let store = SessionDb::open(&path).unwrap();
        store.save("tok").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn memory_store_honors_the_same_contract() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.save("tok").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok"));
        store.save("tok2").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok2"));
        store.remove().unwrap();
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}

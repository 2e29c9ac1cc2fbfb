//! # Database State
//!
//! Wraps the device `Database`: the key-value store for session data and
//! the `users` table for offline accounts.
//!
//! ## Thread Safety
//! The `Database` struct from `cafe-db` contains a `SqlitePool` which
//! is inherently thread-safe. Commands use it without extra locking.

use cafe_db::{Database, KvStore};

/// Wrapper around the device `Database`.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Key-value store for persisted session data.
    pub fn kv(&self) -> KvStore {
        self.db.kv()
    }
}

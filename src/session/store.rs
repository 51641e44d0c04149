//! Credential Store — durable persistence of the device's bearer credential.
//!
//! Holds at most one opaque credential string under a single fixed key,
//! analogous to a browser's `localStorage` slot. The store is a pass-through:
//! no expiry, no validation, no interpretation of the stored string.
//!
//! ## Storage
//! SQLite-backed for durability across restarts. Writes are visible to
//! subsequent reads within the same process; cross-process ordering is
//! whatever SQLite provides and is not guaranteed.

use anyhow::Result;
use parking_lot::Mutex;
use std::path::Path;

/// The single fixed key the credential lives under.
const CREDENTIAL_KEY: &str = "credential";

/// Durable single-slot store for the device's bearer credential.
#[derive(Debug)]
pub struct CredentialStore {
    conn: Mutex<rusqlite::Connection>,
}

impl CredentialStore {
    /// Create an in-memory store (for tests).
    pub fn in_memory() -> Self {
        let conn = rusqlite::Connection::open_in_memory()
            .expect("Failed to open in-memory SQLite for credential store");
        Self::init_tables(&conn);
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open a file-backed store for production use.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = rusqlite::Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
        Self::init_tables(&conn);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &rusqlite::Connection) {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credentials (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .expect("Failed to create credentials table");
    }

    /// Read the stored credential, if any.
    pub fn get(&self) -> Option<String> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT value FROM credentials WHERE key = ?1",
            rusqlite::params![CREDENTIAL_KEY],
            |row| row.get(0),
        )
        .ok()
    }

    /// Store a credential, replacing any previous one.
    pub fn set(&self, credential: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO credentials (key, value) VALUES (?1, ?2)",
            rusqlite::params![CREDENTIAL_KEY, credential],
        )?;
        Ok(())
    }

    /// Remove the stored credential. Removing an absent credential is fine.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM credentials WHERE key = ?1",
            rusqlite::params![CREDENTIAL_KEY],
        )?;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_store_returns_none() {
        let store = CredentialStore::in_memory();
        assert!(store.get().is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = CredentialStore::in_memory();
        store.set("abc.def.ghi").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = CredentialStore::in_memory();
        store.set("first").unwrap();
        store.set("second").unwrap();
        assert_eq!(store.get().as_deref(), Some("second"));
    }

    #[test]
    fn clear_removes_value() {
        let store = CredentialStore::in_memory();
        store.set("token").unwrap();
        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn clear_on_empty_store_succeeds() {
        let store = CredentialStore::in_memory();
        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn file_backed_store_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("session.db");

        {
            let store = CredentialStore::open(&db_path).unwrap();
            store.set("persisted-token").unwrap();
        }

        let store = CredentialStore::open(&db_path).unwrap();
        assert_eq!(store.get().as_deref(), Some("persisted-token"));
    }

    #[test]
    fn open_creates_missing_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("session.db");
        let store = CredentialStore::open(&db_path).unwrap();
        store.set("t").unwrap();
        assert!(db_path.exists());
    }
}

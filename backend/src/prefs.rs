//! Local key-value persistence for user data.
//!
//! Every piece of durable user state (the own-drink catalogue, favorites,
//! categories) is a string value stored under a well-known key in a single
//! `prefs` table inside `barkeep.sqlite`. Connections are opened per
//! operation; all writers run on the same logical request path, so no
//! cross-connection coordination is needed.

use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

const DB_FILE: &str = "barkeep.sqlite";

/// Handle to the key-value store. Cheap to clone; each operation opens its
/// own connection against the same database file.
#[derive(Clone)]
pub struct Prefs {
    path: PathBuf,
}

impl Prefs {
    /// Opens (creating if necessary) the store inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Prefs, String> {
        fs::create_dir_all(data_dir).map_err(|e| e.to_string())?;
        let path = data_dir.join(DB_FILE);
        let conn = Connection::open(&path).map_err(|e| e.to_string())?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prefs (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(|e| e.to_string())?;
        Ok(Prefs { path })
    }

    fn connect(&self) -> Result<Connection, String> {
        Connection::open(&self.path).map_err(|e| e.to_string())
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, String> {
        let conn = self.connect()?;
        let result = conn.query_row(
            "SELECT value FROM prefs WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<(), String> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn has_key(&self, key: &str) -> Result<bool, String> {
        Ok(self.get_string(key)?.is_some())
    }

    pub fn delete(&self, key: &str) -> Result<(), String> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM prefs WHERE key = ?1", params![key])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

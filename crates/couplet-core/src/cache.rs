//! Write-through cache of partner links.
//!
//! Partner and couple ids change rarely but are read on every nudge and
//! timeline fetch, so they are cached in a small local SQLite database.
//! The cache must be invalidated explicitly on partner-unlink; a stale
//! entry would misdirect nudges and partitioning after a disconnect.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::CacheError;
use crate::session::PartnerLink;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS partner_links (
    user_id    TEXT PRIMARY KEY,
    partner_id TEXT NOT NULL,
    couple_id  TEXT NOT NULL
)";

/// Local key-value store of user id -> partner link.
pub struct PartnerCache {
    conn: Mutex<Connection>,
}

impl PartnerCache {
    /// Open (creating if needed) the cache database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| CacheError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the cache at its configured location in the data directory.
    pub fn open_default(config: &crate::config::CacheConfig) -> Result<Self, CacheError> {
        let dir = crate::config::data_dir()?;
        Self::open(dir.join(&config.filename))
    }

    /// Open a private in-memory cache (tests, ephemeral sessions).
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached link for a user, if any.
    pub fn get(&self, user_id: &str) -> Result<Option<PartnerLink>, CacheError> {
        let conn = self.conn();
        let link = conn
            .query_row(
                "SELECT partner_id, couple_id FROM partner_links WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(PartnerLink {
                        partner_id: row.get(0)?,
                        couple_id: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(link)
    }

    /// Write-through: store the link fetched from the profile backend.
    pub fn put(&self, user_id: &str, link: &PartnerLink) -> Result<(), CacheError> {
        self.conn().execute(
            "INSERT OR REPLACE INTO partner_links (user_id, partner_id, couple_id)
             VALUES (?1, ?2, ?3)",
            params![user_id, link.partner_id, link.couple_id],
        )?;
        Ok(())
    }

    /// Drop the cached link for a user. Returns whether an entry existed.
    pub fn invalidate(&self, user_id: &str) -> Result<bool, CacheError> {
        let changed = self.conn().execute(
            "DELETE FROM partner_links WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(changed > 0)
    }
}

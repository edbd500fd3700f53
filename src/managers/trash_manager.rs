//! Trash Manager for urlstash.
//!
//! Implements `TrashManagerTrait` — soft-delete, restore, permanent
//! deletion, and the retention purge sweep, backed by SQLite via `rusqlite`.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::types::entry::{UrlEntry, ENTRY_COLUMNS, TRASH_RETENTION_SECS};
use crate::types::errors::EntryError;
use crate::types::query::{page_frame, Page};

/// Trait defining trash lifecycle operations.
///
/// Single-entry operations are owner-scoped like the entry manager's; bulk
/// operations are best-effort — ids that are missing, foreign-owned, or in
/// the wrong state are silently skipped and the returned count reflects the
/// rows actually changed.
pub trait TrashManagerTrait {
    fn soft_delete(&mut self, owner: &str, id: &str) -> Result<(), EntryError>;
    fn bulk_soft_delete(&mut self, owner: &str, ids: &[String]) -> Result<usize, EntryError>;
    fn restore(&mut self, owner: &str, id: &str) -> Result<(), EntryError>;
    fn bulk_restore(&mut self, owner: &str, ids: &[String]) -> Result<usize, EntryError>;
    /// Permanently removes trashed owned entries. Active entries are never
    /// removed through this path.
    fn hard_delete(&mut self, owner: &str, ids: &[String]) -> Result<usize, EntryError>;
    /// Paginated trash listing, most recently deleted first.
    fn list_trash(&self, owner: &str, page: i64, per_page: i64) -> Result<Page<UrlEntry>, EntryError>;
    /// Process-wide sweep removing every entry trashed longer than the
    /// retention window. Idempotent; intended for a scheduler, not per-request.
    fn purge_expired(&mut self) -> Result<usize, EntryError>;
}

/// Trash manager backed by a SQLite connection.
pub struct TrashManager<'a> {
    conn: &'a Connection,
}

impl<'a> TrashManager<'a> {
    /// Creates a new `TrashManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Builds the `?, ?, ...` placeholder list for an IN clause.
    fn placeholders(n: usize) -> String {
        let mut out = String::new();
        for i in 0..n {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('?');
        }
        out
    }
}

impl<'a> TrashManagerTrait for TrashManager<'a> {
    /// Moves an active owned entry to the trash.
    fn soft_delete(&mut self, owner: &str, id: &str) -> Result<(), EntryError> {
        let affected = self
            .conn
            .execute(
                "UPDATE url_entries SET is_deleted = 1, deleted_at = ?1 \
                 WHERE id = ?2 AND owner = ?3 AND is_deleted = 0",
                params![Self::now(), id, owner],
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(EntryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Moves every matching active owned entry to the trash in one batch
    /// statement. Returns the number of entries trashed.
    fn bulk_soft_delete(&mut self, owner: &str, ids: &[String]) -> Result<usize, EntryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut args: Vec<Value> = Vec::with_capacity(ids.len() + 2);
        args.push(Value::from(Self::now()));
        args.push(Value::from(owner.to_string()));
        args.extend(ids.iter().map(|id| Value::from(id.clone())));

        let affected = self
            .conn
            .execute(
                &format!(
                    "UPDATE url_entries SET is_deleted = 1, deleted_at = ?1 \
                     WHERE owner = ?2 AND is_deleted = 0 AND id IN ({})",
                    Self::placeholders(ids.len())
                ),
                params_from_iter(args),
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        info!(owner, trashed = affected, "bulk soft-delete");
        Ok(affected)
    }

    /// Brings a trashed owned entry back. Restoring an entry that is
    /// already active (or does not exist) is a no-op rather than an error.
    fn restore(&mut self, owner: &str, id: &str) -> Result<(), EntryError> {
        self.conn
            .execute(
                "UPDATE url_entries SET is_deleted = 0, deleted_at = NULL \
                 WHERE id = ?1 AND owner = ?2 AND is_deleted = 1",
                params![id, owner],
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Brings every matching trashed owned entry back in one batch
    /// statement. Returns the number of entries restored.
    fn bulk_restore(&mut self, owner: &str, ids: &[String]) -> Result<usize, EntryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut args: Vec<Value> = Vec::with_capacity(ids.len() + 1);
        args.push(Value::from(owner.to_string()));
        args.extend(ids.iter().map(|id| Value::from(id.clone())));

        let affected = self
            .conn
            .execute(
                &format!(
                    "UPDATE url_entries SET is_deleted = 0, deleted_at = NULL \
                     WHERE owner = ?1 AND is_deleted = 1 AND id IN ({})",
                    Self::placeholders(ids.len())
                ),
                params_from_iter(args),
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        info!(owner, restored = affected, "bulk restore");
        Ok(affected)
    }

    /// Permanently removes trashed owned entries in one batch statement.
    fn hard_delete(&mut self, owner: &str, ids: &[String]) -> Result<usize, EntryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut args: Vec<Value> = Vec::with_capacity(ids.len() + 1);
        args.push(Value::from(owner.to_string()));
        args.extend(ids.iter().map(|id| Value::from(id.clone())));

        let affected = self
            .conn
            .execute(
                &format!(
                    "DELETE FROM url_entries \
                     WHERE owner = ?1 AND is_deleted = 1 AND id IN ({})",
                    Self::placeholders(ids.len())
                ),
                params_from_iter(args),
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        info!(owner, removed = affected, "hard delete from trash");
        Ok(affected)
    }

    /// Lists trashed owned entries, most recently deleted first.
    fn list_trash(&self, owner: &str, page: i64, per_page: i64) -> Result<Page<UrlEntry>, EntryError> {
        let total: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM url_entries WHERE owner = ?1 AND is_deleted = 1",
                params![owner],
                |row| row.get(0),
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        let (page, page_count, offset) = page_frame(total, page, per_page);

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM url_entries WHERE owner = ?1 AND is_deleted = 1 \
                 ORDER BY deleted_at DESC, rowid DESC LIMIT {} OFFSET {}",
                ENTRY_COLUMNS,
                per_page.max(1),
                offset
            ))
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params![owner], UrlEntry::from_row)
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row.map_err(|e| EntryError::DatabaseError(e.to_string()))?);
        }

        Ok(Page {
            items,
            total,
            page,
            page_count,
            per_page: per_page.max(1),
        })
    }

    /// Removes every entry whose trash retention window has elapsed.
    ///
    /// Only rows already in the expired-trash state are touched, so the
    /// sweep can run alongside normal traffic.
    fn purge_expired(&mut self) -> Result<usize, EntryError> {
        let cutoff = Self::now() - TRASH_RETENTION_SECS;
        let purged = self
            .conn
            .execute(
                "DELETE FROM url_entries \
                 WHERE is_deleted = 1 AND deleted_at IS NOT NULL AND deleted_at < ?1",
                params![cutoff],
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        if purged > 0 {
            info!(purged, "purged expired trash entries");
        }
        Ok(purged)
    }
}

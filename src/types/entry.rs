use serde::{Deserialize, Serialize};

/// Seconds a trashed entry is retained before it becomes eligible for purge.
pub const TRASH_RETENTION_SECS: i64 = 30 * 86400;

/// Represents a saved URL entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlEntry {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub url: String,
    pub category: String,
    pub custom_category: String,
    pub sub_category: String,
    pub tags: String,
    pub visit_count: i64,
    pub created_at: i64,
    pub is_deleted: bool,
    pub deleted_at: Option<i64>,
}

impl UrlEntry {
    /// The category this entry should be treated as having: `custom_category`
    /// when `category` is the "others" sentinel, `category` otherwise.
    pub fn effective_category(&self) -> &str {
        if self.category == "others" {
            &self.custom_category
        } else {
            &self.category
        }
    }

    /// Whether this entry has been in the trash longer than the retention
    /// window. Always false for active entries.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.deleted_at {
            Some(deleted_at) if self.is_deleted => now > deleted_at + TRASH_RETENTION_SECS,
            _ => false,
        }
    }

    /// Reads a single `UrlEntry` row into a struct. Expects the column
    /// order of [`ENTRY_COLUMNS`].
    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<UrlEntry> {
        Ok(UrlEntry {
            id: row.get(0)?,
            owner: row.get(1)?,
            name: row.get(2)?,
            url: row.get(3)?,
            category: row.get(4)?,
            custom_category: row.get(5)?,
            sub_category: row.get(6)?,
            tags: row.get(7)?,
            visit_count: row.get(8)?,
            created_at: row.get(9)?,
            is_deleted: row.get(10)?,
            deleted_at: row.get(11)?,
        })
    }
}

/// Column list matching [`UrlEntry::from_row`].
pub(crate) const ENTRY_COLUMNS: &str = "id, owner, name, url, category, custom_category, \
     sub_category, tags, visit_count, created_at, is_deleted, deleted_at";

/// Caller-supplied fields for creating or updating an entry.
///
/// Everything except `url` may be left blank; a blank `name` is derived
/// from the URL host on save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    pub name: String,
    pub url: String,
    pub category: String,
    pub custom_category: String,
    pub sub_category: String,
    pub tags: String,
}

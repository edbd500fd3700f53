//! CSV import boundary for urlstash.
//!
//! Parses rows with case-insensitive header matching, then reconciles each
//! row against the store: active duplicates are skipped, trashed duplicates
//! are restored, everything else is inserted. Per-row problems become
//! counts, never errors — a bad row must not abort the batch.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use uuid::Uuid;

use crate::managers::entry_manager::{derive_name, normalize_url, validate_url};
use crate::types::errors::TransferError;

/// One parsed row from an import file. Missing columns yield empty fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub name: String,
    pub url: String,
    pub category: String,
    pub sub_category: String,
    pub tags: String,
}

/// Outcome counts for a best-effort bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub restored: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.added + self.restored + self.skipped
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} restored, {} skipped",
            self.added, self.restored, self.skipped
        )
    }
}

/// Lowercases a header and folds `_`/`-` to spaces, so `Sub_Category`,
/// `sub-category`, and `SUB CATEGORY` all name the same column.
fn normalize_header(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['_', '-'], " ")
}

/// Reads rows from CSV data using case-insensitive header matching.
///
/// Recognized columns: `name`, `url`, `category`, `sub category`, `tags`.
/// Unrecognized columns are ignored; missing ones yield empty fields.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<ImportRow>, TransferError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| TransferError::Csv(e.to_string()))?
        .clone();

    let position = |wanted: &str| {
        headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
    };
    let name_col = position("name");
    let url_col = position("url");
    let category_col = position("category");
    let sub_category_col = position("sub category");
    let tags_col = position("tags");

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| TransferError::Csv(e.to_string()))?;
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        rows.push(ImportRow {
            name: field(name_col),
            url: field(url_col),
            category: field(category_col),
            sub_category: field(sub_category_col),
            tags: field(tags_col),
        });
    }
    Ok(rows)
}

/// Import writer backed by a SQLite connection.
pub struct Importer<'a> {
    conn: &'a Connection,
}

impl<'a> Importer<'a> {
    /// Creates a new `Importer` using the provided database connection.
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

    /// Parses CSV data and imports the rows for `owner`.
    pub fn import_csv<R: io::Read>(
        &mut self,
        owner: &str,
        reader: R,
    ) -> Result<ImportSummary, TransferError> {
        let rows = read_csv(reader)?;
        self.import_rows(owner, &rows)
    }

    /// Imports rows for `owner`, reconciling each against the store.
    ///
    /// Re-importing the same rows is idempotent: every previously imported
    /// URL is either skipped (still active) or restored (found in trash),
    /// so no duplicate active records are ever created.
    pub fn import_rows(
        &mut self,
        owner: &str,
        rows: &[ImportRow],
    ) -> Result<ImportSummary, TransferError> {
        let mut summary = ImportSummary::default();

        for row in rows {
            let url = normalize_url(&row.url);
            if url.is_empty() {
                summary.skipped += 1;
                continue;
            }
            let parsed = match validate_url(&url) {
                Ok(parsed) => parsed,
                Err(_) => {
                    summary.skipped += 1;
                    continue;
                }
            };

            // Already saved and active: a re-import must not duplicate it.
            let active: Option<String> = self
                .conn
                .query_row(
                    "SELECT id FROM url_entries \
                     WHERE owner = ?1 AND url = ?2 AND is_deleted = 0 LIMIT 1",
                    params![owner, url],
                    |r| r.get(0),
                )
                .optional()
                .map_err(|e| TransferError::DatabaseError(e.to_string()))?;
            if active.is_some() {
                summary.skipped += 1;
                continue;
            }

            // A trashed copy comes back out of the trash instead.
            let trashed: Option<String> = self
                .conn
                .query_row(
                    "SELECT id FROM url_entries \
                     WHERE owner = ?1 AND url = ?2 AND is_deleted = 1 \
                     ORDER BY created_at DESC LIMIT 1",
                    params![owner, url],
                    |r| r.get(0),
                )
                .optional()
                .map_err(|e| TransferError::DatabaseError(e.to_string()))?;
            if let Some(id) = trashed {
                self.conn
                    .execute(
                        "UPDATE url_entries SET is_deleted = 0, deleted_at = NULL \
                         WHERE id = ?1",
                        params![id],
                    )
                    .map_err(|e| TransferError::DatabaseError(e.to_string()))?;
                summary.restored += 1;
                continue;
            }

            let name = if row.name.is_empty() {
                derive_name(&parsed)
            } else {
                row.name.clone()
            };
            let id = Uuid::new_v4().to_string();
            self.conn
                .execute(
                    "INSERT INTO url_entries (id, owner, name, url, category, custom_category, \
                     sub_category, tags, visit_count, created_at, is_deleted, deleted_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, '', ?6, ?7, 0, ?8, 0, NULL)",
                    params![id, owner, name, url, row.category, row.sub_category, row.tags, Self::now()],
                )
                .map_err(|e| TransferError::DatabaseError(e.to_string()))?;
            summary.added += 1;
        }

        info!(
            owner,
            added = summary.added,
            restored = summary.restored,
            skipped = summary.skipped,
            "import finished"
        );
        Ok(summary)
    }
}

//! CSV export boundary for urlstash.
//!
//! Selects the records an export covers and serializes them in the fixed
//! column order consumed by the CSV and PDF writers.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;
use std::io;

use crate::types::entry::{UrlEntry, ENTRY_COLUMNS};
use crate::types::errors::TransferError;

/// Column order shared by every export writer.
pub const EXPORT_HEADERS: [&str; 5] = ["Name", "URL", "Category", "Sub Category", "Tags"];

/// A single exported row in the fixed column order. The Category column
/// carries the effective category, so "others + custom" records export the
/// category a reader expects.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sub Category")]
    pub sub_category: String,
    #[serde(rename = "Tags")]
    pub tags: String,
}

impl From<&UrlEntry> for ExportRow {
    fn from(entry: &UrlEntry) -> Self {
        Self {
            name: entry.name.clone(),
            url: entry.url.clone(),
            category: entry.effective_category().to_string(),
            sub_category: entry.sub_category.clone(),
            tags: entry.tags.clone(),
        }
    }
}

/// Which entries an export covers.
#[derive(Debug, Clone)]
pub enum ExportSelection<'a> {
    /// Every active entry the owner has.
    All,
    /// Only the listed ids (ids that are missing, foreign, or trashed are
    /// left out of the result).
    Selected(&'a [String]),
}

/// Writes entries as CSV rows with the fixed header row.
pub fn write_csv<W: io::Write>(entries: &[UrlEntry], writer: W) -> Result<(), TransferError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(ExportRow::from(entry))
            .map_err(|e| TransferError::Csv(e.to_string()))?;
    }
    wtr.flush().map_err(|e| TransferError::Csv(e.to_string()))?;
    Ok(())
}

/// Export reader backed by a SQLite connection.
pub struct Exporter<'a> {
    conn: &'a Connection,
}

impl<'a> Exporter<'a> {
    /// Creates a new `Exporter` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the caller's active entries, most recent first, restricted
    /// to the selection.
    pub fn export_set(
        &self,
        owner: &str,
        selection: ExportSelection<'_>,
    ) -> Result<Vec<UrlEntry>, TransferError> {
        match selection {
            ExportSelection::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!(
                        "SELECT {} FROM url_entries \
                         WHERE owner = ?1 AND is_deleted = 0 \
                         ORDER BY created_at DESC, rowid DESC",
                        ENTRY_COLUMNS
                    ))
                    .map_err(|e| TransferError::DatabaseError(e.to_string()))?;

                let rows = stmt
                    .query_map(params![owner], UrlEntry::from_row)
                    .map_err(|e| TransferError::DatabaseError(e.to_string()))?;

                let mut results = Vec::new();
                for row in rows {
                    results.push(row.map_err(|e| TransferError::DatabaseError(e.to_string()))?);
                }
                Ok(results)
            }
            ExportSelection::Selected(ids) => {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }

                let mut placeholders = String::new();
                for i in 0..ids.len() {
                    if i > 0 {
                        placeholders.push_str(", ");
                    }
                    placeholders.push('?');
                }

                let mut args: Vec<Value> = Vec::with_capacity(ids.len() + 1);
                args.push(Value::from(owner.to_string()));
                args.extend(ids.iter().map(|id| Value::from(id.clone())));

                let mut stmt = self
                    .conn
                    .prepare(&format!(
                        "SELECT {} FROM url_entries \
                         WHERE owner = ?1 AND is_deleted = 0 AND id IN ({}) \
                         ORDER BY created_at DESC, rowid DESC",
                        ENTRY_COLUMNS, placeholders
                    ))
                    .map_err(|e| TransferError::DatabaseError(e.to_string()))?;

                let rows = stmt
                    .query_map(params_from_iter(args), UrlEntry::from_row)
                    .map_err(|e| TransferError::DatabaseError(e.to_string()))?;

                let mut results = Vec::new();
                for row in rows {
                    results.push(row.map_err(|e| TransferError::DatabaseError(e.to_string()))?);
                }
                Ok(results)
            }
        }
    }
}

//! Entry Manager for urlstash.
//!
//! Implements `EntryManagerTrait` — create, edit, visit, and filtered
//! listing of saved URL entries, backed by SQLite via `rusqlite`.

use rusqlite::{params, params_from_iter, Connection};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;
use uuid::Uuid;

use crate::types::entry::{EntryDraft, UrlEntry, ENTRY_COLUMNS};
use crate::types::errors::{EntryError, FieldErrors};
use crate::types::query::{page_frame, EntryFilter, Page};

/// Trait defining entry management operations.
///
/// Every operation is scoped to `owner`: an entry belonging to another user
/// behaves exactly like a missing one.
pub trait EntryManagerTrait {
    fn add_entry(&mut self, owner: &str, draft: &EntryDraft) -> Result<String, EntryError>;
    fn update_entry(&mut self, owner: &str, id: &str, draft: &EntryDraft) -> Result<(), EntryError>;
    fn get_entry(&self, owner: &str, id: &str) -> Result<UrlEntry, EntryError>;
    /// Counts the visit and returns the stored URL for the caller to follow.
    fn visit_entry(&mut self, owner: &str, id: &str) -> Result<String, EntryError>;
    /// Filtered, paginated listing of active entries, most recent first.
    fn list_entries(
        &self,
        owner: &str,
        filter: &EntryFilter,
        page: i64,
        per_page: i64,
    ) -> Result<Page<UrlEntry>, EntryError>;
}

/// Prefixes `https://` when the raw input has no scheme separator.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// A URL is accepted when it parses as an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<Url, String> {
    let parsed = Url::parse(url).map_err(|e| e.to_string())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme: {}", parsed.scheme()));
    }
    if parsed.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(parsed)
}

/// Derives a display name from the URL host:
/// `https://leetcode.com/problems` → `leetcode`. A `www.` prefix is ignored.
pub fn derive_name(parsed: &Url) -> String {
    let host = parsed.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.').next().unwrap_or(host).to_string()
}

/// Entry manager backed by a SQLite connection.
pub struct EntryManager<'a> {
    conn: &'a Connection,
}

impl<'a> EntryManager<'a> {
    /// Creates a new `EntryManager` using the provided database connection.
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

    /// Validates and normalizes a draft: URL scheme-prefix + well-formedness,
    /// field length budgets, and host-derived name when `name` is blank.
    ///
    /// Collects every failing field before returning so the caller gets one
    /// complete error map per submission.
    fn sanitize(draft: &EntryDraft) -> Result<EntryDraft, EntryError> {
        let mut errors = FieldErrors::new();

        let url = normalize_url(&draft.url);
        let parsed = if url.is_empty() {
            errors.push("url", "a URL is required");
            None
        } else {
            match validate_url(&url) {
                Ok(parsed) => Some(parsed),
                Err(msg) => {
                    errors.push("url", format!("not a valid URL: {}", msg));
                    None
                }
            }
        };

        let name = draft.name.trim();
        if name.len() > 255 {
            errors.push("name", "must be at most 255 characters");
        }
        for (field, value) in [
            ("category", &draft.category),
            ("custom_category", &draft.custom_category),
            ("sub_category", &draft.sub_category),
        ] {
            if value.trim().len() > 100 {
                errors.push(field, "must be at most 100 characters");
            }
        }
        if draft.tags.trim().len() > 255 {
            errors.push("tags", "must be at most 255 characters");
        }

        let parsed = match parsed {
            Some(parsed) if errors.is_empty() => parsed,
            _ => return Err(EntryError::Validation(errors)),
        };

        let name = if name.is_empty() {
            derive_name(&parsed)
        } else {
            name.to_string()
        };

        Ok(EntryDraft {
            name,
            url,
            category: draft.category.trim().to_string(),
            custom_category: draft.custom_category.trim().to_string(),
            sub_category: draft.sub_category.trim().to_string(),
            tags: draft.tags.trim().to_string(),
        })
    }
}

impl<'a> EntryManagerTrait for EntryManager<'a> {
    /// Adds a new entry. Returns the generated entry ID.
    fn add_entry(&mut self, owner: &str, draft: &EntryDraft) -> Result<String, EntryError> {
        let draft = Self::sanitize(draft)?;
        let id = Uuid::new_v4().to_string();
        let now = Self::now();

        self.conn
            .execute(
                "INSERT INTO url_entries (id, owner, name, url, category, custom_category, \
                 sub_category, tags, visit_count, created_at, is_deleted, deleted_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, 0, NULL)",
                params![
                    id,
                    owner,
                    draft.name,
                    draft.url,
                    draft.category,
                    draft.custom_category,
                    draft.sub_category,
                    draft.tags,
                    now
                ],
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        Ok(id)
    }

    /// Replaces the editable fields of an active owned entry.
    fn update_entry(&mut self, owner: &str, id: &str, draft: &EntryDraft) -> Result<(), EntryError> {
        let draft = Self::sanitize(draft)?;

        let affected = self
            .conn
            .execute(
                "UPDATE url_entries SET name = ?1, url = ?2, category = ?3, \
                 custom_category = ?4, sub_category = ?5, tags = ?6 \
                 WHERE id = ?7 AND owner = ?8 AND is_deleted = 0",
                params![
                    draft.name,
                    draft.url,
                    draft.category,
                    draft.custom_category,
                    draft.sub_category,
                    draft.tags,
                    id,
                    owner
                ],
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(EntryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Fetches a single owned entry regardless of trash state.
    fn get_entry(&self, owner: &str, id: &str) -> Result<UrlEntry, EntryError> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM url_entries WHERE id = ?1 AND owner = ?2",
                    ENTRY_COLUMNS
                ),
                params![id, owner],
                UrlEntry::from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => EntryError::NotFound(id.to_string()),
                other => EntryError::DatabaseError(other.to_string()),
            })
    }

    /// Counts a visit to an active owned entry and returns its URL.
    fn visit_entry(&mut self, owner: &str, id: &str) -> Result<String, EntryError> {
        // Increment in place so concurrent visits never lose counts.
        let affected = self
            .conn
            .execute(
                "UPDATE url_entries SET visit_count = visit_count + 1 \
                 WHERE id = ?1 AND owner = ?2 AND is_deleted = 0",
                params![id, owner],
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(EntryError::NotFound(id.to_string()));
        }

        self.conn
            .query_row(
                "SELECT url FROM url_entries WHERE id = ?1 AND owner = ?2",
                params![id, owner],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => EntryError::NotFound(id.to_string()),
                other => EntryError::DatabaseError(other.to_string()),
            })
    }

    /// Composes the listing query from the supplied filters.
    ///
    /// All active filters are AND-ed; each individual match is a
    /// case-insensitive substring test (SQL LIKE). The search text is one
    /// more AND-ed clause that ORs across every text field.
    fn list_entries(
        &self,
        owner: &str,
        filter: &EntryFilter,
        page: i64,
        per_page: i64,
    ) -> Result<Page<UrlEntry>, EntryError> {
        let mut clauses: Vec<&str> = vec!["owner = ?", "is_deleted = 0"];
        let mut args: Vec<String> = vec![owner.to_string()];

        if let Some(category) = filter.category.as_deref().filter(|s| !s.trim().is_empty()) {
            // A custom category satisfies a category-style filter too.
            clauses.push("(category LIKE ? OR custom_category LIKE ?)");
            let pattern = format!("%{}%", category.trim());
            args.push(pattern.clone());
            args.push(pattern);
        }
        if let Some(tag) = filter.tag.as_deref().filter(|s| !s.trim().is_empty()) {
            clauses.push("tags LIKE ?");
            args.push(format!("%{}%", tag.trim()));
        }
        if let Some(sub) = filter.sub_category.as_deref().filter(|s| !s.trim().is_empty()) {
            clauses.push("sub_category LIKE ?");
            args.push(format!("%{}%", sub.trim()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            clauses.push(
                "(name LIKE ? OR url LIKE ? OR tags LIKE ? OR category LIKE ? \
                 OR custom_category LIKE ? OR sub_category LIKE ?)",
            );
            let pattern = format!("%{}%", search.trim());
            for _ in 0..6 {
                args.push(pattern.clone());
            }
        }

        let where_sql = clauses.join(" AND ");

        let total: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM url_entries WHERE {}", where_sql),
                params_from_iter(args.iter()),
                |row| row.get(0),
            )
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        let (page, page_count, offset) = page_frame(total, page, per_page);

        // rowid tiebreak keeps the order stable when created_at collides
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM url_entries WHERE {} \
                 ORDER BY created_at DESC, rowid DESC LIMIT {} OFFSET {}",
                ENTRY_COLUMNS,
                where_sql,
                per_page.max(1),
                offset
            ))
            .map_err(|e| EntryError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params_from_iter(args.iter()), UrlEntry::from_row)
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
}

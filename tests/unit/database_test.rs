//! Unit tests for the urlstash database layer (connection + migrations).

use urlstash::database::{migrations, Database};

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_url_entries_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='url_entries'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "Table 'url_entries' should exist after migrations");
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_indexes = [
        "idx_url_entries_owner",
        "idx_url_entries_created_at",
        "idx_url_entries_owner_url",
    ];

    for index in &expected_indexes {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    // Running migrations a second time should not fail
    let result = migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("test.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open with file path should succeed");

    // Verify the file was created
    assert!(db_path.exists(), "Database file should exist on disk");
}

#[test]
fn test_url_entries_table_schema() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    // Insert an entry to verify the schema is correct
    conn.execute(
        "INSERT INTO url_entries (id, owner, name, url, category, custom_category, \
         sub_category, tags, visit_count, created_at, is_deleted, deleted_at) \
         VALUES (?1, ?2, ?3, ?4, 'dev', '', 'rust', 'code', 0, 1700000000, 0, NULL)",
        ["e-1", "ada", "Example", "https://example.com"],
    )
    .expect("Should be able to insert into url_entries table");

    let (url, visit_count, deleted_at): (String, i64, Option<i64>) = conn
        .query_row(
            "SELECT url, visit_count, deleted_at FROM url_entries WHERE id = ?1",
            ["e-1"],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .expect("Should be able to query url_entries");

    assert_eq!(url, "https://example.com");
    assert_eq!(visit_count, 0);
    assert_eq!(deleted_at, None);
}

#[test]
fn test_trashed_row_round_trips_deleted_at() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO url_entries (id, owner, url, created_at, is_deleted, deleted_at) \
         VALUES ('e-2', 'ada', 'https://example.org', 1700000000, 1, 1700000100)",
        [],
    )
    .expect("Should insert a trashed row");

    let deleted_at: Option<i64> = conn
        .query_row(
            "SELECT deleted_at FROM url_entries WHERE id = 'e-2'",
            [],
            |row| row.get(0),
        )
        .expect("Should query url_entries");

    assert_eq!(deleted_at, Some(1700000100));
}

//! urlstash — personal bookmark manager core.
//!
//! Entry point: runs an interactive console demo against an in-memory
//! database, walking each component end to end.

use urlstash::database::Database;
use urlstash::managers::entry_manager::{EntryManager, EntryManagerTrait};
use urlstash::managers::trash_manager::{TrashManager, TrashManagerTrait};
use urlstash::transfer::{write_csv, ExportSelection, Exporter, Importer};
use urlstash::types::entry::EntryDraft;
use urlstash::types::query::EntryFilter;

fn main() {
    println!();
    println!("urlstash v{} — demo mode", env!("CARGO_PKG_VERSION"));
    println!();

    let db = Database::open_in_memory().expect("failed to open database");
    let conn = db.connection();

    demo_entries(conn);
    demo_listing(conn);
    demo_trash(conn);
    demo_transfer(conn);

    println!("all components demonstrated");
}

fn section(name: &str) {
    println!("--- {} ---", name);
}

fn demo_entries(conn: &rusqlite::Connection) {
    section("Entry Manager");
    let mut mgr = EntryManager::new(conn);

    let id = mgr
        .add_entry(
            "demo",
            &EntryDraft {
                url: "leetcode.com/problems".to_string(),
                tags: "dsa,practice".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    let entry = mgr.get_entry("demo", &id).unwrap();
    println!("  Added entry: name={} url={}", entry.name, entry.url);

    let url = mgr.visit_entry("demo", &id).unwrap();
    let entry = mgr.get_entry("demo", &id).unwrap();
    println!("  Visited {} (visit_count = {})", url, entry.visit_count);

    let rejected = mgr.add_entry("demo", &EntryDraft::default());
    println!("  Blank URL rejected: {}", rejected.is_err());
    println!();
}

fn demo_listing(conn: &rusqlite::Connection) {
    section("Query Composer");
    let mut mgr = EntryManager::new(conn);

    for (url, category, custom, tags) in [
        ("https://github.com", "dev", "", "code,git"),
        ("https://news.ycombinator.com", "news", "", "tech"),
        ("https://investopedia.com", "others", "Finance", "money"),
    ] {
        mgr.add_entry(
            "demo",
            &EntryDraft {
                url: url.to_string(),
                category: category.to_string(),
                custom_category: custom.to_string(),
                tags: tags.to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let all = mgr
        .list_entries("demo", &EntryFilter::none(), 1, 10)
        .unwrap();
    println!("  Active entries: {} (page {}/{})", all.total, all.page, all.page_count);

    let finance = mgr
        .list_entries(
            "demo",
            &EntryFilter {
                category: Some("finance".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .unwrap();
    println!(
        "  Filter category 'finance': {} match(es) via custom category",
        finance.total
    );
    println!();
}

fn demo_trash(conn: &rusqlite::Connection) {
    section("Trash Manager");
    let mut entries = EntryManager::new(conn);
    let mut trash = TrashManager::new(conn);

    let id = entries
        .add_entry(
            "demo",
            &EntryDraft {
                url: "https://example.com/temp".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

    trash.soft_delete("demo", &id).unwrap();
    println!(
        "  Soft-deleted 1 entry, trash now holds {}",
        trash.list_trash("demo", 1, 10).unwrap().total
    );

    trash.restore("demo", &id).unwrap();
    let entry = entries.get_entry("demo", &id).unwrap();
    println!(
        "  Restored: is_deleted={} deleted_at={:?}",
        entry.is_deleted, entry.deleted_at
    );

    let purged = trash.purge_expired().unwrap();
    println!("  Purge sweep removed {} expired entries", purged);
    println!();
}

fn demo_transfer(conn: &rusqlite::Connection) {
    section("CSV Transfer");
    let exporter = Exporter::new(conn);
    let mut importer = Importer::new(conn);

    let entries = exporter.export_set("demo", ExportSelection::All).unwrap();
    let mut csv_bytes = Vec::new();
    write_csv(&entries, &mut csv_bytes).unwrap();
    println!("  Exported {} entries as {} CSV bytes", entries.len(), csv_bytes.len());

    let summary = importer.import_csv("demo", csv_bytes.as_slice()).unwrap();
    println!("  Re-imported the export: {}", summary);
    println!();
}

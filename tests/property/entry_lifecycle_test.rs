//! Property-based tests for the entry lifecycle.
//!
//! These tests verify that the trash flag and deletion timestamp stay
//! coupled through arbitrary delete/restore sequences, and that visit
//! counting is exact.

use proptest::prelude::*;
use urlstash::database::Database;
use urlstash::managers::entry_manager::{EntryManager, EntryManagerTrait};
use urlstash::managers::trash_manager::{TrashManager, TrashManagerTrait};
use urlstash::types::entry::EntryDraft;
use urlstash::types::query::EntryFilter;

/// Strategy for generating valid URL strings.
/// Produces URLs with http/https scheme, alphanumeric host, and optional path.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for a delete/restore plan over a small catalog: for each entry,
/// whether to trash it and whether to restore it afterwards.
fn arb_plan() -> impl Strategy<Value = Vec<(bool, bool)>> {
    proptest::collection::vec((any::<bool>(), any::<bool>()), 1..8)
}

fn draft(url: &str) -> EntryDraft {
    EntryDraft {
        url: url.to_string(),
        ..Default::default()
    }
}

/// Counts rows where the trash flag and deletion timestamp disagree.
fn invariant_violations(db: &Database) -> i64 {
    db.connection()
        .query_row(
            "SELECT COUNT(*) FROM url_entries \
             WHERE (is_deleted = 1 AND deleted_at IS NULL) \
                OR (is_deleted = 0 AND deleted_at IS NOT NULL)",
            [],
            |row| row.get(0),
        )
        .expect("invariant query failed")
}

// **Property: delete/restore keeps the flag and timestamp coupled**
//
// *For any* sequence of soft-deletes and restores over a catalog,
// every row SHALL satisfy `is_deleted == 1` exactly when `deleted_at`
// is non-NULL, and restored entries SHALL reappear in the listing.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn lifecycle_keeps_flag_and_timestamp_coupled(
        urls in proptest::collection::vec(arb_url(), 1..8),
        plan in arb_plan(),
    ) {
        // Set up a fresh in-memory database for each test case
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut entries = EntryManager::new(db.connection());
        let mut trash = TrashManager::new(db.connection());

        let ids: Vec<String> = urls
            .iter()
            .map(|url| entries.add_entry("ada", &draft(url)).expect("add_entry failed"))
            .collect();

        let mut expected_active = ids.len() as i64;
        for (id, (delete, restore)) in ids.iter().zip(plan.iter().cycle()) {
            if *delete {
                trash.soft_delete("ada", id).expect("soft_delete failed");
                expected_active -= 1;
                if *restore {
                    trash.restore("ada", id).expect("restore failed");
                    expected_active += 1;
                }
            }
        }

        prop_assert_eq!(invariant_violations(&db), 0);

        let page = entries
            .list_entries("ada", &EntryFilter::none(), 1, 100)
            .expect("list_entries failed");
        prop_assert_eq!(page.total, expected_active);

        // Restoring everything always empties the trash
        trash.bulk_restore("ada", &ids).expect("bulk_restore failed");
        prop_assert_eq!(invariant_violations(&db), 0);
        let trash_page = trash.list_trash("ada", 1, 100).expect("list_trash failed");
        prop_assert_eq!(trash_page.total, 0);
    }

    #[test]
    fn visit_count_matches_visit_calls(
        url in arb_url(),
        visits in 1usize..20,
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut entries = EntryManager::new(db.connection());

        let id = entries.add_entry("ada", &draft(&url)).expect("add_entry failed");
        for _ in 0..visits {
            let stored = entries.visit_entry("ada", &id).expect("visit_entry failed");
            prop_assert_eq!(&stored, &url);
        }

        let entry = entries.get_entry("ada", &id).expect("get_entry failed");
        prop_assert_eq!(entry.visit_count, visits as i64);
    }

    #[test]
    fn expired_implies_deleted(
        url in arb_url(),
        age_secs in 0i64..100 * 86400,
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut entries = EntryManager::new(db.connection());
        let mut trash = TrashManager::new(db.connection());

        let id = entries.add_entry("ada", &draft(&url)).expect("add_entry failed");

        // Active entries never expire, no matter how far ahead now lies
        let entry = entries.get_entry("ada", &id).expect("get_entry failed");
        prop_assert!(!entry.is_expired(entry.created_at + age_secs));

        trash.soft_delete("ada", &id).expect("soft_delete failed");
        let entry = entries.get_entry("ada", &id).expect("get_entry failed");
        if entry.is_expired(entry.deleted_at.unwrap() + age_secs) {
            prop_assert!(entry.is_deleted);
            prop_assert!(age_secs > 30 * 86400);
        }
    }
}

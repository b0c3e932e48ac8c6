// crates/wish-ledger-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Exercises the async store API over the single-writer runtime.
// ============================================================================
//! ## Overview
//! Covers idempotent schema setup, insert and per-child reads, trending
//! ranking with window exclusion, on-disk persistence across store handles,
//! and worker re-establishment after a failed connection attempt.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use wish_ledger_core::ChildHash;
use wish_ledger_core::Locale;
use wish_ledger_core::NewWishEntry;
use wish_ledger_core::ScopeId;
use wish_ledger_store_sqlite::ConnectionProvider;
use wish_ledger_store_sqlite::SqliteConnectionProvider;
use wish_ledger_store_sqlite::SqliteStoreConfig;
use wish_ledger_store_sqlite::SqliteStoreError;
use wish_ledger_store_sqlite::SqliteWishStore;
use wish_ledger_store_sqlite::StoreLocation;

fn entry(child_hash: &str, wish: &str, created_at: &str) -> NewWishEntry {
    NewWishEntry {
        child_hash: ChildHash::new(child_hash.to_string()),
        child_name: "Charlie".to_string(),
        age: Some(9),
        wish: wish.to_string(),
        created_at: created_at.to_string(),
        owning_scope: ScopeId::new("scope-a".to_string()),
        locale: Locale::default(),
    }
}

fn memory_store() -> SqliteWishStore {
    SqliteWishStore::new(SqliteStoreConfig::default())
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let store = memory_store();
    store.initialize().await.expect("first schema run");
    store.initialize().await.expect("second schema run");
    assert!(store.is_attached().await);
}

#[tokio::test]
async fn worker_establishment_prepares_the_schema() {
    // No explicit initialize: the first dispatched operation must find the
    // table in place because establishment runs the DDL on the fresh
    // connection before the worker takes over.
    let store = memory_store();
    let id = store
        .insert_entry(entry("hash-a", "a new sled", "2026-08-01T10:00:00Z"))
        .await
        .expect("insert on a freshly established worker");
    assert!(id.get() >= 1);

    let hash = ChildHash::new("hash-a".to_string());
    assert_eq!(store.count_for_child(&hash).await.expect("count"), 1);
}

#[tokio::test]
async fn store_is_detached_until_first_use() {
    let store = memory_store();
    assert!(!store.is_attached().await);
    store.initialize().await.expect("schema run");
    assert!(store.is_attached().await);
}

#[tokio::test]
async fn insert_assigns_increasing_ids_and_counts_per_child() {
    let store = memory_store();
    store.initialize().await.expect("schema run");

    let first = store
        .insert_entry(entry("hash-a", "a new sled", "2026-08-01T10:00:00Z"))
        .await
        .expect("first insert");
    let second = store
        .insert_entry(entry("hash-a", "a red bike", "2026-08-02T10:00:00Z"))
        .await
        .expect("second insert");
    store
        .insert_entry(entry("hash-b", "a puzzle", "2026-08-02T11:00:00Z"))
        .await
        .expect("third insert");

    assert!(second.get() > first.get());
    let hash_a = ChildHash::new("hash-a".to_string());
    let hash_b = ChildHash::new("hash-b".to_string());
    assert_eq!(store.count_for_child(&hash_a).await.expect("count a"), 2);
    assert_eq!(store.count_for_child(&hash_b).await.expect("count b"), 1);
}

#[tokio::test]
async fn recent_for_child_orders_newest_first_and_caps_rows() {
    let store = memory_store();
    store.initialize().await.expect("schema run");

    let hash = ChildHash::new("hash-a".to_string());
    for (wish, stamp) in [
        ("wish one", "2026-08-01T10:00:00Z"),
        ("wish two", "2026-08-02T10:00:00Z"),
        ("wish three", "2026-08-03T10:00:00Z"),
    ] {
        store.insert_entry(entry("hash-a", wish, stamp)).await.expect("insert");
    }

    let recent = store.recent_for_child(&hash, 2).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].wish, "wish three");
    assert_eq!(recent[1].wish, "wish two");

    let all = store.entries_for_child(&hash).await.expect("history");
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].wish, "wish one");
}

#[tokio::test]
async fn same_second_entries_break_ties_by_insertion_order() {
    let store = memory_store();
    store.initialize().await.expect("schema run");

    let hash = ChildHash::new("hash-a".to_string());
    store
        .insert_entry(entry("hash-a", "earlier insert", "2026-08-01T10:00:00Z"))
        .await
        .expect("insert");
    store
        .insert_entry(entry("hash-a", "later insert", "2026-08-01T10:00:00Z"))
        .await
        .expect("insert");

    let recent = store.recent_for_child(&hash, 10).await.expect("recent");
    assert_eq!(recent[0].wish, "later insert");
    assert_eq!(recent[1].wish, "earlier insert");
}

#[tokio::test]
async fn trending_ranks_by_total_then_recency_and_excludes_old_rows() {
    let store = memory_store();
    store.initialize().await.expect("schema run");

    for (child, wish, stamp) in [
        ("hash-a", "lego castle", "2026-08-10T10:00:00Z"),
        ("hash-b", "lego castle", "2026-08-11T10:00:00Z"),
        ("hash-c", "a red bike", "2026-08-12T10:00:00Z"),
        ("hash-d", "old classic", "2020-01-01T00:00:00Z"),
    ] {
        store.insert_entry(entry(child, wish, stamp)).await.expect("insert");
    }

    let ranked = store.trending_since("2026-08-01T00:00:00Z", 5).await.expect("trending");
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].wish, "lego castle");
    assert_eq!(ranked[0].total, 2);
    assert_eq!(ranked[0].last_seen, "2026-08-11T10:00:00Z");
    assert_eq!(ranked[1].wish, "a red bike");
    assert_eq!(ranked[1].total, 1);

    let totals = store.window_totals("2026-08-01T00:00:00Z").await.expect("totals");
    assert_eq!(totals.total_wishes, 3);
    assert_eq!(totals.unique_children, 3);
}

#[tokio::test]
async fn trending_breaks_total_ties_by_last_seen() {
    let store = memory_store();
    store.initialize().await.expect("schema run");

    store
        .insert_entry(entry("hash-a", "older tie", "2026-08-10T10:00:00Z"))
        .await
        .expect("insert");
    store
        .insert_entry(entry("hash-b", "newer tie", "2026-08-12T10:00:00Z"))
        .await
        .expect("insert");

    let ranked = store.trending_since("2026-08-01T00:00:00Z", 5).await.expect("trending");
    assert_eq!(ranked[0].wish, "newer tie");
    assert_eq!(ranked[1].wish, "older tie");
}

#[tokio::test]
async fn on_disk_store_persists_across_handles() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = SqliteStoreConfig {
        location: StoreLocation::File(dir.path().join("wishes.db")),
        ..SqliteStoreConfig::default()
    };

    let store = SqliteWishStore::new(config.clone());
    store.initialize().await.expect("schema run");
    store
        .insert_entry(entry("hash-a", "a new sled", "2026-08-01T10:00:00Z"))
        .await
        .expect("insert");
    drop(store);

    let reopened = SqliteWishStore::new(config);
    reopened.initialize().await.expect("schema run on existing file");
    let hash = ChildHash::new("hash-a".to_string());
    assert_eq!(reopened.count_for_child(&hash).await.expect("count"), 1);
}

#[tokio::test]
async fn store_rejects_directory_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = SqliteStoreConfig {
        location: StoreLocation::File(dir.path().to_path_buf()),
        ..SqliteStoreConfig::default()
    };
    let store = SqliteWishStore::new(config);
    let outcome = store.initialize().await;
    assert!(matches!(outcome, Err(SqliteStoreError::Invalid(_))));
    assert!(!store.is_attached().await);
}

/// Fails its first open, then delegates to the real in-memory provider.
struct FlakyProvider {
    /// Number of open attempts observed so far.
    attempts: AtomicUsize,
    /// Real provider used after the first failure.
    inner: SqliteConnectionProvider,
}

impl ConnectionProvider for FlakyProvider {
    fn open(&self) -> Result<rusqlite::Connection, SqliteStoreError> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(SqliteStoreError::Io("transient open failure".to_string()));
        }
        self.inner.open()
    }
}

#[tokio::test]
async fn failed_open_is_not_cached_and_next_use_retries() {
    let provider = Arc::new(FlakyProvider {
        attempts: AtomicUsize::new(0),
        inner: SqliteConnectionProvider::new(SqliteStoreConfig::default()),
    });
    let store =
        SqliteWishStore::with_provider(Arc::clone(&provider) as Arc<dyn ConnectionProvider>, 8);

    let first = store.initialize().await;
    assert!(matches!(first, Err(SqliteStoreError::Io(_))));
    assert!(!store.is_attached().await);

    store.initialize().await.expect("second attempt succeeds");
    assert!(store.is_attached().await);
    assert_eq!(provider.attempts.load(Ordering::SeqCst), 2);
}

/// Counts opens to show concurrent first use creates exactly one worker.
struct CountingProvider {
    /// Number of open attempts observed so far.
    attempts: AtomicUsize,
    /// Real provider backing every successful open.
    inner: SqliteConnectionProvider,
}

impl ConnectionProvider for CountingProvider {
    fn open(&self) -> Result<rusqlite::Connection, SqliteStoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.inner.open()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_use_opens_exactly_one_connection() {
    let provider = Arc::new(CountingProvider {
        attempts: AtomicUsize::new(0),
        inner: SqliteConnectionProvider::new(SqliteStoreConfig::default()),
    });
    let store =
        SqliteWishStore::with_provider(Arc::clone(&provider) as Arc<dyn ConnectionProvider>, 64);
    store.initialize().await.expect("schema run");

    let mut tasks = Vec::new();
    for index in 0..16 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let stamp = format!("2026-08-01T10:00:{index:02}Z");
            store.insert_entry(entry("hash-a", "a new sled", &stamp)).await
        }));
    }
    for task in tasks {
        task.await.expect("task join").expect("insert");
    }

    let hash = ChildHash::new("hash-a".to_string());
    assert_eq!(store.count_for_child(&hash).await.expect("count"), 16);
    assert_eq!(provider.attempts.load(Ordering::SeqCst), 1);
}

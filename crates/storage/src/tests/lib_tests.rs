use super::*;
use engine::HistoryEntry;

fn sample_history(count: i64) -> HistoryLog {
    let mut log = HistoryLog::new();
    for n in 0..count {
        log.record(HistoryEntry::new(format!("{n} + 1"), (n + 1).to_string(), n));
    }
    log
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("nebula_calc_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn missing_history_loads_empty() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let history = storage.load_history().await.expect("load");
    assert!(history.is_empty());
}

#[tokio::test]
async fn saves_and_reloads_history_in_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let history = sample_history(3);
    storage.save_history(&history).await.expect("save");

    let loaded = storage.load_history().await.expect("load");
    assert_eq!(loaded, history);
    assert_eq!(loaded.latest().map(|e| e.result.as_str()), Some("3"));
}

#[tokio::test]
async fn malformed_history_is_discarded() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .put_value(HISTORY_STORAGE_KEY, "{not json")
        .await
        .expect("put");
    let loaded = storage.load_history().await.expect("load");
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn oversized_history_is_truncated_on_load() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let entries: Vec<_> = (0..35)
        .map(|n| HistoryEntry::new("1 + 1", "2", n))
        .collect();
    let raw = serde_json::to_string(&entries).expect("encode");
    storage.put_value(HISTORY_STORAGE_KEY, &raw).await.expect("put");

    let loaded = storage.load_history().await.expect("load");
    assert_eq!(loaded.len(), engine::domain::MAX_HISTORY_ENTRIES);
}

#[tokio::test]
async fn clear_history_removes_the_key() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.save_history(&sample_history(2)).await.expect("save");
    storage.clear_history().await.expect("clear");

    assert_eq!(
        storage.get_value(HISTORY_STORAGE_KEY).await.expect("get"),
        None
    );
    assert!(!storage.delete_value(HISTORY_STORAGE_KEY).await.expect("delete"));
}

#[tokio::test]
async fn muted_flag_defaults_off_and_round_trips() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert!(!storage.load_muted().await.expect("load"));

    storage.save_muted(true).await.expect("save");
    assert!(storage.load_muted().await.expect("load"));

    storage.save_muted(false).await.expect("save");
    assert!(!storage.load_muted().await.expect("load"));
}

#[tokio::test]
async fn put_value_overwrites_existing_key() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put_value("theme", "nebula").await.expect("put");
    storage.put_value("theme", "aurora").await.expect("put");
    assert_eq!(
        storage.get_value("theme").await.expect("get").as_deref(),
        Some("aurora")
    );
}

#[test]
fn sqlite_path_ignores_memory_and_query_suffix() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/calc.db?mode=rwc"),
        Some(PathBuf::from("./data/calc.db"))
    );
    assert_eq!(sqlite_path("postgres://host/db"), None);
}

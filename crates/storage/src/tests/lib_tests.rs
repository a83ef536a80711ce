use super::*;

fn temp_database_url(root: &Path, name: &str) -> (PathBuf, String) {
    let db_path = root.join("nested").join(name);
    let url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));
    (db_path, url)
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn stores_overwrites_and_removes_entries() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    assert_eq!(storage.load_entry("token").await.expect("load"), None);

    storage.store_entry("token", "abc").await.expect("store");
    storage.store_entry("token", "def").await.expect("overwrite");
    assert_eq!(
        storage.load_entry("token").await.expect("load"),
        Some("def".to_string())
    );

    assert!(storage.remove_entry("token").await.expect("remove"));
    assert!(!storage.remove_entry("token").await.expect("remove again"));
    assert_eq!(storage.load_entry("token").await.expect("load"), None);
}

#[tokio::test]
async fn entries_are_independent_by_key() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.store_entry("token", "abc").await.expect("store token");
    storage.store_entry("user", "{}").await.expect("store user");

    storage.remove_entry("user").await.expect("remove user");
    assert_eq!(
        storage.load_entry("token").await.expect("load"),
        Some("abc".to_string())
    );
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let (db_path, database_url) = temp_database_url(temp_root.path(), "session.db");

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn entries_survive_reopening_the_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let (_db_path, database_url) = temp_database_url(temp_root.path(), "reopen.db");

    let storage = Storage::new(&database_url).await.expect("db");
    storage.store_entry("token", "persisted").await.expect("store");
    storage.pool().close().await;

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.load_entry("token").await.expect("load"),
        Some("persisted".to_string())
    );
}

#[test]
fn memory_urls_have_no_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/session.db?mode=rwc"),
        Some(PathBuf::from("./data/session.db"))
    );
}

use tasklist_core::db::migrations::latest_version;
use tasklist_core::db::{open_db, open_db_in_memory, DbError};
use tasklist_core::{SqliteTaskStore, StoreError, TaskStore, TaskValidationError};
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn create_then_fetch_all_contains_exactly_one_new_record() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    store.create("existing").unwrap();
    let before: HashSet<_> = store.fetch_all().unwrap().into_iter().map(|t| t.id).collect();

    let created = store.create("Buy milk").unwrap();

    assert!(!before.contains(&created.id));
    let all = store.fetch_all().unwrap();
    let matching: Vec<_> = all.iter().filter(|t| t.title == "Buy milk").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);
}

#[test]
fn update_preserves_identity_and_creates_no_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    let created = store.create("draft").unwrap();

    let updated = store.update(created.id, "final").unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "final");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    let all = store.fetch_all().unwrap();
    assert_eq!(all, vec![updated]);
}

#[test]
fn delete_is_complete_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    let keep = store.create("keep").unwrap();
    let gone = store.create("gone").unwrap();

    store.delete(gone.id).unwrap();

    let ids: Vec<_> = store.fetch_all().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![keep.id]);
    assert!(store.get(gone.id).unwrap().is_none());
    let err = store.delete(gone.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == gone.id));
}

#[test]
fn update_of_unknown_identity_is_not_found_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    store.create("a").unwrap();
    store.create("b").unwrap();
    let before = store.fetch_all().unwrap();

    let unknown = Uuid::new_v4();
    let err = store.update(unknown, "c").unwrap_err();

    assert!(matches!(err, StoreError::NotFound(id) if id == unknown));
    assert_eq!(store.fetch_all().unwrap(), before);
}

#[test]
fn fetch_all_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    store.create("A").unwrap();
    store.create("B").unwrap();
    store.create("C").unwrap();

    let titles: Vec<_> = store
        .fetch_all()
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[test]
fn editing_a_task_does_not_move_it() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    let first = store.create("first").unwrap();
    store.create("second").unwrap();

    store.update(first.id, "first, edited").unwrap();

    let titles: Vec<_> = store
        .fetch_all()
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["first, edited", "second"]);
}

#[test]
fn buy_milk_scenario() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();

    let task = store.create("Buy milk").unwrap();
    assert_eq!(task.title, "Buy milk");

    let task = store.update(task.id, "Buy oat milk").unwrap();
    assert_eq!(task.title, "Buy oat milk");
    assert_eq!(store.fetch_all().unwrap(), vec![task.clone()]);

    store.delete(task.id).unwrap();
    assert!(store.fetch_all().unwrap().is_empty());
    assert!(matches!(
        store.delete(task.id),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn update_rejects_blank_title_and_keeps_old_one() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    let task = store.create("keep me").unwrap();

    let err = store.update(task.id, " \n").unwrap_err();

    assert!(matches!(
        err,
        StoreError::InvalidArgument(TaskValidationError::EmptyTitle)
    ));
    assert_eq!(store.get(task.id).unwrap().unwrap().title, "keep me");
}

#[test]
fn read_only_medium_reports_write_errors_without_partial_state() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    let task = store.create("stable").unwrap();
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    assert!(matches!(
        store.create("new"),
        Err(StoreError::StorageWrite(DbError::Sqlite(_)))
    ));
    assert!(matches!(
        store.update(task.id, "changed"),
        Err(StoreError::StorageWrite(_))
    ));
    assert!(matches!(
        store.delete(task.id),
        Err(StoreError::StorageWrite(_))
    ));
    assert_eq!(store.fetch_all().unwrap(), vec![task]);
}

#[test]
fn corrupt_row_is_reported_as_read_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO tasks (uuid, title) VALUES ('not-a-uuid', 'broken');",
        [],
    )
    .unwrap();

    let err = store.fetch_all().unwrap_err();
    assert!(matches!(
        err,
        StoreError::StorageRead(DbError::InvalidData(ref message)) if message.contains("not-a-uuid")
    ));
}

#[test]
fn tasks_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let store = SqliteTaskStore::try_new(&conn).unwrap();
        store.create("persisted").unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteTaskStore::try_new(&conn).unwrap();
    assert_eq!(store.fetch_all().unwrap(), vec![created]);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_tasks_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("tasks"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE tasks (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskStore::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "tasks",
            column: "created_at"
        })
    ));
}

use super::*;
use tempfile::TempDir;

#[test]
fn test_open_memory_enables_foreign_keys() {
    let db = SqliteDb::open_memory().unwrap();
    assert!(db.foreign_keys_enabled().unwrap());
}

#[test]
fn test_open_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("target.db");
    let db = SqliteDb::open(&path).unwrap();
    db.conn()
        .execute_batch("CREATE TABLE t (id INTEGER)")
        .unwrap();
    assert!(path.exists());
}

#[test]
fn test_new_handles_memory_path() {
    let db = SqliteDb::new(":memory:").unwrap();
    assert!(db.foreign_keys_enabled().unwrap());
}

#[test]
fn test_transaction_commits() {
    let db = SqliteDb::open_memory().unwrap();
    db.transaction(|conn| {
        conn.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")
            .map_err(|e| DbError::Transaction(e.to_string()))
    })
    .unwrap();

    let count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_transaction_rolls_back_on_error() {
    let db = SqliteDb::open_memory().unwrap();
    let result = db.transaction(|conn| {
        conn.execute_batch("CREATE TABLE t (id INTEGER)")
            .map_err(|e| DbError::Transaction(e.to_string()))?;
        Err::<(), _>(DbError::Transaction("forced".into()))
    });
    assert!(result.is_err());

    let count: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 't'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);
}

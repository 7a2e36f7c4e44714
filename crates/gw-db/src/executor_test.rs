use super::*;
use gw_core::Migration;

fn migration(name: &str, sql: &str) -> Migration {
    Migration::from_source(name, sql).unwrap()
}

fn table_exists(db: &SqliteDb, name: &str) -> bool {
    let count: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |r| r.get(0),
        )
        .unwrap();
    count > 0
}

fn row_count(db: &SqliteDb, table: &str) -> i64 {
    db.conn()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn test_apply_simple_migration() {
    let db = SqliteDb::open_memory().unwrap();
    let m = migration(
        "0001_create.sql",
        "CREATE TABLE a (id INTEGER); INSERT INTO a VALUES (1);",
    );
    Executor::new(&db).apply(&m).unwrap();

    assert!(table_exists(&db, "a"));
    assert_eq!(row_count(&db, "a"), 1);
}

#[test]
fn test_failure_rolls_back_whole_migration() {
    let db = SqliteDb::open_memory().unwrap();
    let m = migration(
        "0001_partial.sql",
        "CREATE TABLE a (id INTEGER); INSERT INTO nonexistent VALUES (1);",
    );
    let err = Executor::new(&db).apply(&m).unwrap_err();

    match err {
        DbError::Statement {
            migration, index, ..
        } => {
            assert_eq!(migration, "0001_partial");
            assert_eq!(index, 1);
        }
        other => panic!("expected Statement error, got {other}"),
    }
    // The first statement must not survive the failure.
    assert!(!table_exists(&db, "a"));
}

#[test]
fn test_star_copy_preflight_rejects_column_mismatch() {
    let db = SqliteDb::open_memory().unwrap();
    Executor::new(&db)
        .apply(&migration(
            "0001_seed.sql",
            "CREATE TABLE trades (id TEXT, status TEXT, underlying TEXT);
             INSERT INTO trades VALUES ('t1', 'open', 'SPY');",
        ))
        .unwrap();

    // Shadow table drops a column: the positional copy would silently
    // misalign, so it must fail before execution.
    let m = migration(
        "0002_rebuild.sql",
        "CREATE TABLE trades_new (id TEXT, status TEXT);
         INSERT INTO trades_new SELECT * FROM trades;",
    );
    let err = Executor::new(&db).apply(&m).unwrap_err();

    match err {
        DbError::SchemaMismatch { index, message, .. } => {
            assert_eq!(index, 1);
            assert!(message.contains("underlying"), "message: {message}");
        }
        other => panic!("expected SchemaMismatch, got {other}"),
    }
    // Rolled back: the shadow table is gone and the source untouched.
    assert!(!table_exists(&db, "trades_new"));
    assert_eq!(row_count(&db, "trades"), 1);
}

#[test]
fn test_star_copy_rejects_missing_target() {
    let db = SqliteDb::open_memory().unwrap();
    Executor::new(&db)
        .apply(&migration(
            "0001_seed.sql",
            "CREATE TABLE trades (id TEXT); INSERT INTO trades VALUES ('t1');",
        ))
        .unwrap();

    let m = migration("0002_copy.sql", "INSERT INTO trades_new SELECT * FROM trades;");
    let err = Executor::new(&db).apply(&m).unwrap_err();
    assert!(matches!(err, DbError::SchemaMismatch { .. }));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_star_copy_with_matching_columns() {
    let db = SqliteDb::open_memory().unwrap();
    Executor::new(&db)
        .apply(&migration(
            "0001_seed.sql",
            "CREATE TABLE t (id INTEGER, name TEXT);
             INSERT INTO t VALUES (1, 'a');
             INSERT INTO t VALUES (2, 'b');",
        ))
        .unwrap();

    Executor::new(&db)
        .apply(&migration(
            "0002_copy.sql",
            "CREATE TABLE t_new (id INTEGER, name TEXT);
             INSERT INTO t_new SELECT * FROM t;",
        ))
        .unwrap();

    assert_eq!(row_count(&db, "t_new"), 2);
    let name: String = db
        .conn()
        .query_row("SELECT name FROM t_new WHERE id = 2", [], |r| r.get(0))
        .unwrap();
    assert_eq!(name, "b");
}

#[test]
fn test_rebuild_with_foreign_key_suspension() {
    let db = SqliteDb::open_memory().unwrap();
    Executor::new(&db)
        .apply(&migration(
            "0001_seed.sql",
            "CREATE TABLE parent (id TEXT PRIMARY KEY, kind TEXT);
             CREATE TABLE child (id TEXT PRIMARY KEY, parent_id TEXT REFERENCES parent(id));
             INSERT INTO parent VALUES ('p1', 'x');
             INSERT INTO child VALUES ('c1', 'p1');",
        ))
        .unwrap();

    let m = migration(
        "0002_rebuild_parent.sql",
        "PRAGMA foreign_keys=OFF;
         CREATE TABLE IF NOT EXISTS parent_new (
             id TEXT PRIMARY KEY,
             kind TEXT CHECK (kind IN ('x', 'y'))
         );
         INSERT INTO parent_new SELECT * FROM parent;
         DROP TABLE parent;
         ALTER TABLE parent_new RENAME TO parent;
         PRAGMA foreign_keys=ON;",
    );
    Executor::new(&db).apply(&m).unwrap();

    assert_eq!(row_count(&db, "parent"), 1);
    assert_eq!(row_count(&db, "child"), 1);
    assert!(db.foreign_keys_enabled().unwrap());
    // The widened constraint is live.
    assert!(db
        .conn()
        .execute_batch("INSERT INTO parent VALUES ('p2', 'z')")
        .is_err());
}

#[test]
fn test_missing_reenable_is_consistency_error() {
    let db = SqliteDb::open_memory().unwrap();
    let m = migration(
        "0001_forgot.sql",
        "PRAGMA foreign_keys=OFF; CREATE TABLE t (id INTEGER);",
    );
    let err = Executor::new(&db).apply(&m).unwrap_err();

    assert!(matches!(err, DbError::Consistency(_)));
    assert!(err.to_string().contains("0001_forgot"));
}

#[test]
fn test_failure_during_suspension_restores_enforcement() {
    let db = SqliteDb::open_memory().unwrap();
    let m = migration(
        "0001_broken.sql",
        "PRAGMA foreign_keys=OFF; INSERT INTO nonexistent VALUES (1); PRAGMA foreign_keys=ON;",
    );
    let err = Executor::new(&db).apply(&m).unwrap_err();

    assert!(matches!(err, DbError::Statement { index: 1, .. }));
    assert!(db.foreign_keys_enabled().unwrap());
}

#[test]
fn test_parse_star_copy_shapes() {
    assert_eq!(
        parse_star_copy("INSERT INTO trades_new SELECT * FROM trades"),
        Some(("trades_new".to_string(), "trades".to_string()))
    );
    assert_eq!(
        parse_star_copy("insert into \"trades_new\" select * from `trades`"),
        Some(("trades_new".to_string(), "trades".to_string()))
    );
    // Explicit column lists and filtered copies pass through untouched.
    assert_eq!(
        parse_star_copy("INSERT INTO t (id) SELECT id FROM s"),
        None
    );
    assert_eq!(
        parse_star_copy("INSERT INTO t SELECT * FROM s WHERE id > 1"),
        None
    );
    assert_eq!(parse_star_copy("SELECT * FROM s"), None);
}

#[test]
fn test_is_foreign_keys_pragma() {
    assert!(is_foreign_keys_pragma("PRAGMA foreign_keys=OFF"));
    assert!(is_foreign_keys_pragma("pragma foreign_keys = on"));
    assert!(!is_foreign_keys_pragma("PRAGMA journal_mode=WAL"));
    assert!(!is_foreign_keys_pragma("SELECT 'PRAGMA foreign_keys'"));
}

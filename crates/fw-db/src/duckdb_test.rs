use super::*;

const PEOPLE: &[Column] = &[
    Column::new("id", ColumnType::Integer),
    Column::new("name", ColumnType::Text),
    Column::new("active", ColumnType::Boolean),
    Column::new("seen_at", ColumnType::Timestamp),
];

async fn people_db() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE people (id BIGINT PRIMARY KEY, name VARCHAR, active BOOLEAN, seen_at TIMESTAMP)",
    )
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_new_memory_path() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    db.execute("CREATE TABLE t (id INT)").await.unwrap();
    assert!(db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_from_path_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE kept (id INT)").await.unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert!(db.relation_exists("kept").await.unwrap());
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
}

#[tokio::test]
async fn test_execute_error_carries_driver_message() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("CREATE TABLE (").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
    assert!(!err.driver_message().starts_with("[D002]"));
    assert!(err.to_string().starts_with("[D002]"));
}

#[tokio::test]
async fn test_missing_table_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute("INSERT INTO nowhere VALUES (1)").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[tokio::test]
async fn test_relation_exists_schema_qualified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA ops; CREATE TABLE ops.log (id INT)")
        .await
        .unwrap();
    assert!(db.relation_exists("ops.log").await.unwrap());
    assert!(!db.relation_exists("log").await.unwrap());
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_insert_and_select_typed_rows() {
    let db = people_db().await;
    let rows = vec![
        Row::new(vec![
            SqlValue::Integer(2),
            SqlValue::from("bob"),
            SqlValue::Boolean(false),
            SqlValue::Null,
        ]),
        Row::new(vec![
            SqlValue::Integer(1),
            SqlValue::from("alice"),
            SqlValue::Boolean(true),
            SqlValue::Null,
        ]),
    ];
    db.insert(PEOPLE, "people", &rows, &[]).await.unwrap();

    let read = db.select(PEOPLE, "people ORDER BY id").await.unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[0].get_i64(0).unwrap(), 1);
    assert_eq!(read[0].get_text(1).unwrap(), "alice");
    assert!(read[0].get_bool(2).unwrap());
    assert_eq!(read[0].get_timestamp(3).unwrap(), None);
    assert_eq!(read[1].get_text(1).unwrap(), "bob");
}

#[tokio::test]
async fn test_insert_now_action_sets_timestamp() {
    let db = people_db().await;
    let row = Row::new(vec![
        SqlValue::Integer(1),
        SqlValue::from("alice"),
        SqlValue::Boolean(true),
        SqlValue::Null,
    ]);
    db.insert(PEOPLE, "people", &[row], &[("seen_at", ColumnAction::Now)])
        .await
        .unwrap();

    let read = db.select(PEOPLE, "people").await.unwrap();
    assert!(read[0].get_timestamp(3).unwrap().is_some());
}

#[tokio::test]
async fn test_select_where_clause() {
    let db = people_db().await;
    db.execute_batch(
        "INSERT INTO people VALUES (1, 'a', true, NULL), (2, 'b', false, NULL), (3, 'c', true, NULL)",
    )
    .await
    .unwrap();

    let read = db
        .select(&PEOPLE[..2], "people WHERE active ORDER BY id DESC")
        .await
        .unwrap();
    let ids: Vec<i64> = read.iter().map(|r| r.get_i64(0).unwrap()).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(read[0].len(), 2);
}

#[tokio::test]
async fn test_insert_row_length_mismatch() {
    let db = people_db().await;
    let row = Row::new(vec![SqlValue::Integer(1)]);
    let err = db.insert(PEOPLE, "people", &[row], &[]).await.unwrap_err();
    assert!(matches!(err, DbError::SchemaMismatch(_)));
}

#[tokio::test]
async fn test_insert_value_type_mismatch() {
    let db = people_db().await;
    let row = Row::new(vec![
        SqlValue::from("not a number"),
        SqlValue::from("alice"),
        SqlValue::Boolean(true),
        SqlValue::Null,
    ]);
    let err = db.insert(PEOPLE, "people", &[row], &[]).await.unwrap_err();
    assert!(matches!(err, DbError::SchemaMismatch(_)));
}

#[tokio::test]
async fn test_transaction_commit_keeps_changes() {
    let db = people_db().await;
    db.begin().await.unwrap();
    db.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1)")
        .await
        .unwrap();
    db.commit().await.unwrap();
    assert!(db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_transaction_rollback_discards_partial_batch() {
    let db = people_db().await;
    db.begin().await.unwrap();
    let err = db
        .execute_batch("CREATE TABLE t (id INT); INSERT INTO missing VALUES (1)")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
    db.rollback().await.unwrap();

    assert!(!db.relation_exists("t").await.unwrap());
    // The connection is usable again after the rollback.
    db.execute("INSERT INTO people (id) VALUES (1)").await.unwrap();
}

#[test]
fn test_build_select_reads_timestamps_as_millis() {
    let sql = build_select(PEOPLE, "people ORDER BY id");
    assert_eq!(
        sql,
        "SELECT id, name, active, epoch_ms(seen_at) AS seen_at FROM people ORDER BY id"
    );
}

#[test]
fn test_build_insert_with_action() {
    let sql = build_insert(PEOPLE, "people", &[("seen_at", ColumnAction::Now)]);
    assert_eq!(
        sql,
        "INSERT INTO people (id, name, active, seen_at) VALUES (?, ?, ?, current_timestamp)"
    );
}

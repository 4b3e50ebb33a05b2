use super::*;
use crate::response::ResponseStatus;
use async_trait::async_trait;
use fw_db::{Column, ColumnAction, DbResult, DuckDbBackend, Row};
use fw_migrate::{LogStore, MigrationCatalog};

// ── Helpers ────────────────────────────────────────────────────────────

fn handler(steps: &[(i64, &str)]) -> LifecycleHandler {
    let mut catalog = MigrationCatalog::new();
    for (order, statement) in steps {
        catalog = catalog.with(*order, format!("step {order}"), *statement).unwrap();
    }
    LifecycleHandler::new(MigrationProcessor::new(catalog))
}

fn event(request_type: &str, physical_id: Option<&str>) -> LifecycleEvent {
    let mut payload = serde_json::json!({
        "RequestType": request_type,
        "RequestId": "req-7",
        "StackId": "stack/orders",
        "LogicalResourceId": "DatabaseMigrations",
    });
    if let Some(id) = physical_id {
        payload["PhysicalResourceId"] = serde_json::Value::from(id);
    }
    LifecycleEvent::from_json(&payload.to_string()).unwrap()
}

/// Panics on every call.
struct ExplodingDb;

#[async_trait]
impl Database for ExplodingDb {
    async fn execute(&self, _sql: &str) -> DbResult<usize> {
        panic!("driver crashed")
    }

    async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
        panic!("driver crashed")
    }

    async fn select(&self, _schema: &[Column], _source: &str) -> DbResult<Vec<Row>> {
        panic!("driver crashed")
    }

    async fn insert(
        &self,
        _schema: &[Column],
        _table: &str,
        _rows: &[Row],
        _actions: &[(&str, ColumnAction)],
    ) -> DbResult<()> {
        panic!("driver crashed")
    }

    async fn relation_exists(&self, _name: &str) -> DbResult<bool> {
        panic!("driver crashed")
    }

    fn db_type(&self) -> &'static str {
        "exploding"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_initializes_and_migrates() {
    let handler = handler(&[(1, "create table t (id int)"), (2, "insert into t values (1)")]);
    let db = DuckDbBackend::in_memory().unwrap();

    let response = handler.handle(&event("Create", None), &db).await;
    assert!(response.is_success());
    assert_eq!(response.reason, None);
    assert_eq!(response.data.last_successful_order, Some(2));
    assert_eq!(response.data.migration_table, "migrations");
    assert!(response.physical_resource_id.starts_with("migrations-"));
    assert_eq!(response.request_id, "req-7");
    assert_eq!(response.stack_id, "stack/orders");
    assert_eq!(response.logical_resource_id, "DatabaseMigrations");
}

#[tokio::test]
async fn test_update_keeps_physical_id_and_applies_new_steps() {
    let db = DuckDbBackend::in_memory().unwrap();
    handler(&[(1, "create table t (id int)")])
        .handle(&event("Create", None), &db)
        .await;

    let response = handler(&[(1, "create table t (id int)"), (2, "create table u (id int)")])
        .handle(&event("Update", Some("migrations-abc")), &db)
        .await;
    assert!(response.is_success());
    assert_eq!(response.physical_resource_id, "migrations-abc");
    assert_eq!(response.data.last_successful_order, Some(2));
}

#[tokio::test]
async fn test_update_does_not_create_log_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let response = handler(&[(1, "create table t (id int)")])
        .handle(&event("Update", Some("migrations-abc")), &db)
        .await;

    assert_eq!(response.status, ResponseStatus::Failed);
    assert!(response.reason.unwrap().contains("[LC001]"));
    assert!(!db.relation_exists("migrations").await.unwrap());
}

#[tokio::test]
async fn test_delete_is_a_no_op() {
    let db = DuckDbBackend::in_memory().unwrap();
    let response = handler(&[(1, "create table t (id int)")])
        .handle(&event("Delete", Some("migrations-abc")), &db)
        .await;

    assert!(response.is_success());
    assert_eq!(response.physical_resource_id, "migrations-abc");
    assert_eq!(response.data.last_successful_order, None);
    assert!(!db.relation_exists("migrations").await.unwrap());
    assert!(!db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_failing_step_reports_failed_with_driver_message() {
    let db = DuckDbBackend::in_memory().unwrap();
    let response = handler(&[(1, "create table t (id int)"), (2, "create tabel u (id int)")])
        .handle(&event("Create", None), &db)
        .await;

    assert_eq!(response.status, ResponseStatus::Failed);
    assert_eq!(response.data.last_successful_order, Some(1));

    let log = LogStore::default().load_entries(&db).await.unwrap();
    assert_eq!(response.reason.as_deref(), Some(log[1].message.as_str()));
}

#[tokio::test]
async fn test_integrity_error_reports_failed() {
    let db = DuckDbBackend::in_memory().unwrap();
    handler(&[(1, "create table t (id int)")])
        .handle(&event("Create", None), &db)
        .await;

    let response = handler(&[(1, "create table t (id bigint)")])
        .handle(&event("Update", Some("migrations-abc")), &db)
        .await;
    assert_eq!(response.status, ResponseStatus::Failed);
    assert!(response.reason.unwrap().contains("query text modified"));
    assert_eq!(response.data.last_successful_order, None);
}

#[tokio::test]
async fn test_panic_in_pass_reports_failed() {
    let response = handler(&[(1, "create table t (id int)")])
        .handle(&event("Create", None), &ExplodingDb)
        .await;
    assert_eq!(response.status, ResponseStatus::Failed);
    let reason = response.reason.unwrap();
    assert!(reason.contains("[LC002]"));
    assert!(reason.contains("driver crashed"));
}

#[test]
fn test_empty_physical_id_is_replaced() {
    let handler = handler(&[]);
    let id = handler.physical_resource_id(&event("Update", Some("")));
    assert!(id.starts_with("migrations-"));
    assert_ne!(id, handler.physical_resource_id(&event("Create", None)));
}

#[test]
fn test_response_json_shape() {
    let handler = handler(&[]);
    let response = handler.failure(
        &event("Create", None),
        "migrations-1".to_string(),
        "could not connect".to_string(),
    );
    let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Status": "FAILED",
            "Reason": "could not connect",
            "PhysicalResourceId": "migrations-1",
            "StackId": "stack/orders",
            "RequestId": "req-7",
            "LogicalResourceId": "DatabaseMigrations",
            "Data": { "MigrationTable": "migrations" }
        })
    );
}

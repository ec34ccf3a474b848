//! BatchExecutor
//!
//! 요청 하나를 하나의 ConnectionScope 안에서 실행합니다.
//!
//! 1. SchemaRegistry로 테이블/컬럼 검증, 행 수 제한 검사
//! 2. 행마다 Statement 생성 (하나라도 실패하면 아무것도 실행하지 않음)
//! 3. 같은 커넥션에서 순차 실행, 행 단위 실패는 기록 후 계속 진행
//! 4. 마지막에 한 번 커밋 (앞서 성공한 행은 롤백되지 않음)

use std::sync::Arc;

use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::Connection;

use tg_core::{SchemaRegistry, TableSchema};
use tg_sql::builder::DEFAULT_ROWS;
use tg_sql::{
    Criteria, DeleteBuilder, InsertBuilder, QueryError, Row, SelectBuilder, SelectParams,
    Statement, UpdateBuilder,
};

use crate::decode::{bind_values, row_to_record, rows_to_records, Record};
use crate::error::{EngineError, ErrorKind, Result};
use crate::result::OperationResult;
use crate::scope::ConnectionScope;
use crate::verb::Verb;

/// 행 수 제한
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// 조회/배치 요청 한 번에 허용되는 최대 행 수
    pub max_rows: u64,

    /// 조회 시 `num_rows` 미지정이면 사용할 행 수
    pub default_rows: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_rows: 1000,
            default_rows: DEFAULT_ROWS,
        }
    }
}

/// 단건(PK) 요청 결과
#[derive(Debug, Clone, PartialEq)]
pub enum SingleOutcome {
    /// GET: 조회된 행
    Record(Record),
    /// PUT/DELETE: 한 행 이상 적용됨
    Applied,
}

/// 배치 실행 계획의 한 행
struct PlannedRow {
    key: Option<Value>,
    statement: Statement,
}

/// CRUD 실행기
///
/// 요청 간 상태를 갖지 않으며, 복제해서 여러 요청에서 동시에 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    registry: Arc<SchemaRegistry>,
    pool: SqlitePool,
    limits: Limits,
}

impl BatchExecutor {
    pub fn new(registry: Arc<SchemaRegistry>, pool: SqlitePool, limits: Limits) -> Self {
        Self {
            registry,
            pool,
            limits,
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// PK 기준 GET/PUT/DELETE
    ///
    /// 일치하는 행이 없으면 `NotFound`입니다. PUT은 `payload`가 필요합니다.
    pub async fn execute_single(
        &self,
        table: &str,
        pk_value: &Value,
        verb: Verb,
        payload: Option<&Row>,
    ) -> Result<SingleOutcome> {
        let schema = self.registry.table(table)?;
        let pk_column = schema.primary_key_column();

        if !is_scalar_key(pk_value) {
            return Err(EngineError::validation(format!(
                "invalid value for primary key {}",
                pk_column
            )));
        }

        let statement = match verb {
            Verb::Get => SelectBuilder::new(schema).build(
                &[],
                &Criteria::empty().eq(pk_column, pk_value.clone()),
                Some(1),
            )?,
            Verb::Put => {
                let row = payload.ok_or_else(|| EngineError::validation("missing row payload"))?;
                UpdateBuilder::new(schema).build(row, pk_column, pk_value)?
            }
            Verb::Delete => DeleteBuilder::new(schema).build(pk_column, pk_value)?,
            Verb::Post => {
                return Err(EngineError::validation(format!(
                    "{} is not supported for a single record",
                    verb
                )))
            }
        };

        let mut scope = ConnectionScope::acquire(&self.pool).await?;
        let outcome = run_single(scope.conn(), table, pk_value, verb, &statement).await;
        scope.release(outcome).await
    }

    /// POST/PUT/DELETE 배치
    ///
    /// 모든 행을 먼저 검증하고, 검증에 실패하면 아무것도 실행하지 않습니다.
    /// 실행 중 저장소 에러는 행 단위로 기록되며 배치는 계속 진행됩니다.
    pub async fn execute_batch(
        &self,
        table: &str,
        verb: Verb,
        rows: &[Row],
    ) -> Result<OperationResult> {
        let schema = self.registry.table(table)?;

        if !verb.allows_batch() {
            return Err(EngineError::validation(format!(
                "{} is not supported as a batch mutation",
                verb
            )));
        }
        if rows.len() as u64 > self.limits.max_rows {
            return Err(EngineError::validation(format!(
                "batch of {} rows exceeds the maximum of {}",
                rows.len(),
                self.limits.max_rows
            )));
        }

        let planned = plan_batch(schema, verb, rows)?;

        let mut scope = ConnectionScope::acquire(&self.pool).await?;
        let result = run_batch(scope.conn(), verb, &planned).await;
        let result = scope.release(Ok(result)).await?;

        tracing::info!(
            table,
            verb = %verb,
            success = result.success_count,
            failed = result.errors.len(),
            "batch completed"
        );
        Ok(result)
    }

    /// 조건 조회 (get-multi)
    pub async fn get_multi(&self, table: &str, params: &SelectParams) -> Result<Vec<Record>> {
        let schema = self.registry.table(table)?;

        if let Some(num_rows) = params.num_rows {
            if num_rows > self.limits.max_rows {
                return Err(EngineError::validation(format!(
                    "num_rows {} exceeds the maximum of {}",
                    num_rows, self.limits.max_rows
                )));
            }
        }

        let statement = SelectBuilder::new(schema)
            .default_limit(self.limits.default_rows)
            .build(&params.columns, &params.criteria, params.num_rows)?;

        let mut scope = ConnectionScope::acquire(&self.pool).await?;
        let outcome = fetch_records(scope.conn(), table, &statement).await;
        scope.release(outcome).await
    }
}

fn is_scalar_key(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Array(_) | Value::Object(_))
}

/// 모든 행의 Statement를 미리 생성
fn plan_batch(schema: &TableSchema, verb: Verb, rows: &[Row]) -> Result<Vec<PlannedRow>> {
    let pk_column = schema.primary_key_column();

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let row_err = |e: QueryError| match EngineError::from(e) {
                EngineError::Validation { message } => {
                    EngineError::validation(format!("row {}: {}", index, message))
                }
                other => other,
            };

            let key = row.get(pk_column).cloned();
            let statement = match verb {
                Verb::Post => InsertBuilder::new(schema).build(row).map_err(row_err)?,
                Verb::Put | Verb::Delete => {
                    let pk_value = key.as_ref().ok_or_else(|| {
                        EngineError::validation(format!(
                            "row {}: missing primary key {}",
                            index, pk_column
                        ))
                    })?;
                    schema
                        .validate_columns(row.keys().map(|s| s.as_str()))
                        .map_err(|e| row_err(e.into()))?;

                    if verb == Verb::Put {
                        let changes: Row = row
                            .iter()
                            .filter(|(column, _)| column.as_str() != pk_column)
                            .map(|(column, value)| (column.clone(), value.clone()))
                            .collect();
                        UpdateBuilder::new(schema)
                            .build(&changes, pk_column, pk_value)
                            .map_err(row_err)?
                    } else {
                        DeleteBuilder::new(schema)
                            .build(pk_column, pk_value)
                            .map_err(row_err)?
                    }
                }
                Verb::Get => {
                    return Err(EngineError::validation(format!(
                        "{} is not supported as a batch mutation",
                        verb
                    )))
                }
            };

            Ok(PlannedRow { key, statement })
        })
        .collect()
}

async fn run_single(
    conn: &mut SqliteConnection,
    table: &str,
    pk_value: &Value,
    verb: Verb,
    statement: &Statement,
) -> Result<SingleOutcome> {
    tracing::debug!(sql = %statement.sql, params = statement.params.len(), "executing statement");
    let query = bind_values(sqlx::query::<Sqlite>(&statement.sql), &statement.params);

    let found = match verb {
        Verb::Get => query
            .fetch_optional(&mut *conn)
            .await?
            .map(|row| row_to_record(&row).map(SingleOutcome::Record))
            .transpose()?,
        _ => {
            let result = query.execute(&mut *conn).await?;
            (result.rows_affected() > 0).then_some(SingleOutcome::Applied)
        }
    };

    found.ok_or_else(|| EngineError::not_found(format!("{} with key {} not found", table, pk_value)))
}

/// 행마다 savepoint 안에서 실행
///
/// 실패한 행은 savepoint로 되돌리므로 같은 트랜잭션의 다른 행에 영향을 주지 않습니다.
async fn run_batch(conn: &mut SqliteConnection, verb: Verb, planned: &[PlannedRow]) -> OperationResult {
    let mut result = OperationResult::default();

    for (index, row) in planned.iter().enumerate() {
        tracing::debug!(
            row = index,
            sql = %row.statement.sql,
            params = row.statement.params.len(),
            "executing statement"
        );

        match execute_in_savepoint(conn, &row.statement).await {
            Ok(0) if verb != Verb::Post => {
                tracing::warn!(row = index, "no row matched key");
                result.record_error(
                    index,
                    row.key.clone(),
                    ErrorKind::NotFound,
                    "no row matched the primary key",
                );
            }
            Ok(_) => result.record_success(),
            Err(e) => {
                tracing::warn!(row = index, "row failed: {}", e);
                result.record_error(index, row.key.clone(), ErrorKind::Store, e.to_string());
            }
        }
    }

    result
}

async fn execute_in_savepoint(
    conn: &mut SqliteConnection,
    statement: &Statement,
) -> std::result::Result<u64, sqlx::Error> {
    let mut savepoint = conn.begin().await?;
    let affected = bind_values(sqlx::query::<Sqlite>(&statement.sql), &statement.params)
        .execute(&mut *savepoint)
        .await?
        .rows_affected();
    savepoint.commit().await?;
    Ok(affected)
}

async fn fetch_records(
    conn: &mut SqliteConnection,
    table: &str,
    statement: &Statement,
) -> Result<Vec<Record>> {
    tracing::debug!(table, sql = %statement.sql, params = statement.params.len(), "executing statement");
    let rows = bind_values(sqlx::query::<Sqlite>(&statement.sql), &statement.params)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows_to_records(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_pool, registry};
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn executor_with(limits: Limits) -> BatchExecutor {
        BatchExecutor::new(registry(), memory_pool().await, limits)
    }

    async fn executor() -> BatchExecutor {
        executor_with(Limits::default()).await
    }

    async fn seed(executor: &BatchExecutor) {
        let rows = vec![
            row(json!({ "entity_id": "1", "co_name": "Alpha", "pbid": "p1" })),
            row(json!({ "entity_id": "2", "co_name": "Beta", "pbid": "p2" })),
            row(json!({ "entity_id": "3", "co_name": "Gamma", "pbid": "p3" })),
        ];
        let result = executor
            .execute_batch("company", Verb::Post, &rows)
            .await
            .unwrap();
        assert_eq!(result.success_count, 3);
    }

    async fn count(executor: &BatchExecutor) -> usize {
        executor
            .get_multi("company", &SelectParams::default())
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_get_single_record() {
        let executor = executor().await;
        seed(&executor).await;

        let outcome = executor
            .execute_single("company", &json!("2"), Verb::Get, None)
            .await
            .unwrap();

        let SingleOutcome::Record(record) = outcome else {
            panic!("expected record");
        };
        assert_eq!(record["co_name"], json!("Beta"));
        assert_eq!(record["weburl"], Value::Null);
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let executor = executor().await;
        seed(&executor).await;

        let err = executor
            .execute_single("company", &json!("doesnotexist"), Verb::Get, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_table_is_not_found() {
        let executor = executor().await;
        let err = executor
            .execute_single("invoices", &json!(1), Verb::Get, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = executor
            .execute_batch("invoices", Verb::Post, &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_put_then_get_merges_fields() {
        let executor = executor().await;
        seed(&executor).await;

        let changes = row(json!({ "weburl": "www.beta.biz", "pbid": "p22" }));
        let outcome = executor
            .execute_single("company", &json!("2"), Verb::Put, Some(&changes))
            .await
            .unwrap();
        assert_eq!(outcome, SingleOutcome::Applied);

        let SingleOutcome::Record(record) = executor
            .execute_single("company", &json!("2"), Verb::Get, None)
            .await
            .unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(
            Value::Object(record),
            json!({
                "entity_id": "2",
                "co_name": "Beta",
                "pbid": "p22",
                "weburl": "www.beta.biz"
            })
        );
    }

    #[tokio::test]
    async fn test_put_and_delete_missing_key_are_not_found() {
        let executor = executor().await;
        let changes = row(json!({ "pbid": "x" }));

        let err = executor
            .execute_single("company", &json!("404"), Verb::Put, Some(&changes))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = executor
            .execute_single("company", &json!("404"), Verb::Delete, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_put_single_store_error() {
        let executor = executor().await;
        seed(&executor).await;

        let changes = row(json!({ "co_name": "Alpha" }));
        let err = executor
            .execute_single("company", &json!("2"), Verb::Put, Some(&changes))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_delete_single() {
        let executor = executor().await;
        seed(&executor).await;

        let outcome = executor
            .execute_single("company", &json!("1"), Verb::Delete, None)
            .await
            .unwrap();
        assert_eq!(outcome, SingleOutcome::Applied);
        assert_eq!(count(&executor).await, 2);
    }

    #[tokio::test]
    async fn test_single_rejects_post_and_missing_payload() {
        let executor = executor().await;

        let err = executor
            .execute_single("company", &json!("1"), Verb::Post, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = executor
            .execute_single("company", &json!("1"), Verb::Put, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_batch_partial_failure_commits_other_rows() {
        let executor = executor().await;

        let rows = vec![
            row(json!({ "entity_id": "1", "co_name": "Alpha" })),
            row(json!({ "entity_id": "2", "co_name": "Alpha" })),
            row(json!({ "entity_id": "3", "co_name": "Gamma" })),
        ];
        let result = executor
            .execute_batch("company", Verb::Post, &rows)
            .await
            .unwrap();

        assert_eq!(result.success_count, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row_index, 1);
        assert_eq!(result.errors[0].row_key, Some(json!("2")));
        assert_eq!(result.errors[0].error_kind, ErrorKind::Store);

        let records = executor
            .get_multi("company", &SelectParams::default())
            .await
            .unwrap();
        let keys: Vec<&Value> = records.iter().map(|r| &r["entity_id"]).collect();
        assert_eq!(keys, vec![&json!("1"), &json!("3")]);
    }

    #[tokio::test]
    async fn test_batch_over_limit_executes_nothing() {
        let executor = executor_with(Limits {
            max_rows: 2,
            default_rows: 2,
        })
        .await;

        let rows = vec![
            row(json!({ "entity_id": "1", "co_name": "Alpha" })),
            row(json!({ "entity_id": "2", "co_name": "Beta" })),
            row(json!({ "entity_id": "3", "co_name": "Gamma" })),
        ];
        let err = executor
            .execute_batch("company", Verb::Post, &rows)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(count(&executor).await, 0);
    }

    #[tokio::test]
    async fn test_batch_invalid_row_executes_nothing() {
        let executor = executor().await;

        let rows = vec![
            row(json!({ "entity_id": "1", "co_name": "Alpha" })),
            row(json!({ "entity_id": "2", "ceo": "Nobody" })),
        ];
        let err = executor
            .execute_batch("company", Verb::Post, &rows)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("row 1"));
        assert_eq!(count(&executor).await, 0);
    }

    #[tokio::test]
    async fn test_batch_put_requires_primary_key() {
        let executor = executor().await;
        seed(&executor).await;

        let rows = vec![
            row(json!({ "entity_id": "1", "pbid": "x" })),
            row(json!({ "pbid": "y" })),
        ];
        let err = executor
            .execute_batch("company", Verb::Put, &rows)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // 첫 번째 행도 적용되지 않음
        let SingleOutcome::Record(record) = executor
            .execute_single("company", &json!("1"), Verb::Get, None)
            .await
            .unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(record["pbid"], json!("p1"));
    }

    #[tokio::test]
    async fn test_batch_put_and_delete() {
        let executor = executor().await;
        seed(&executor).await;

        let updates = vec![
            row(json!({ "entity_id": "1", "pbid": "new1" })),
            row(json!({ "entity_id": "404", "pbid": "ghost" })),
            row(json!({ "entity_id": "3", "weburl": "g.biz" })),
        ];
        let result = executor
            .execute_batch("company", Verb::Put, &updates)
            .await
            .unwrap();
        assert_eq!(result.success_count, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row_index, 1);
        assert_eq!(result.errors[0].error_kind, ErrorKind::NotFound);

        let deletes = vec![
            row(json!({ "entity_id": "1" })),
            row(json!({ "entity_id": "2" })),
        ];
        let result = executor
            .execute_batch("company", Verb::Delete, &deletes)
            .await
            .unwrap();
        assert_eq!(result.success_count, 2);
        assert!(!result.has_errors());
        assert_eq!(count(&executor).await, 1);
    }

    #[tokio::test]
    async fn test_batch_get_is_rejected() {
        let executor = executor().await;
        let err = executor
            .execute_batch("company", Verb::Get, &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_multi_with_criteria_and_projection() {
        let executor = executor().await;
        seed(&executor).await;

        let params = SelectParams {
            columns: vec!["co_name".to_string()],
            criteria: Criteria::empty().eq("pbid", "p3"),
            num_rows: None,
        };
        let records = executor.get_multi("company", &params).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(Value::Object(records[0].clone()), json!({ "co_name": "Gamma" }));
    }

    #[tokio::test]
    async fn test_get_multi_respects_limits() {
        let executor = executor_with(Limits {
            max_rows: 3,
            default_rows: 2,
        })
        .await;
        seed(&executor).await;

        // 기본 행 수
        assert_eq!(count(&executor).await, 2);

        let params = SelectParams {
            num_rows: Some(3),
            ..Default::default()
        };
        assert_eq!(executor.get_multi("company", &params).await.unwrap().len(), 3);

        let params = SelectParams {
            num_rows: Some(4),
            ..Default::default()
        };
        let err = executor.get_multi("company", &params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_multi_rejects_unknown_column() {
        let executor = executor().await;
        let params = SelectParams {
            criteria: Criteria::empty().eq("salary", 10),
            ..Default::default()
        };
        let err = executor.get_multi("company", &params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_default_primary_key_table() {
        let executor = executor().await;

        let rows = vec![
            row(json!({ "id": 1, "name": "Ada", "email": "ada@example.com" })),
            row(json!({ "id": 2, "name": "Grace" })),
        ];
        let result = executor
            .execute_batch("person", Verb::Post, &rows)
            .await
            .unwrap();
        assert_eq!(result.success_count, 2);

        let SingleOutcome::Record(record) = executor
            .execute_single("person", &json!(1), Verb::Get, None)
            .await
            .unwrap()
        else {
            panic!("expected record");
        };
        assert_eq!(record["id"], json!(1));
        assert_eq!(record["name"], json!("Ada"));
    }
}

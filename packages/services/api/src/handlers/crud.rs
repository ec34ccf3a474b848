//! /api/{table} CRUD 핸들러
//!
//! 각 핸들러는 하나의 Verb에 고정되어 있고, 라우터를 만들 때 명시적으로 연결됩니다.
//!
//! - `/api/{table}`: get-multi, post/put/delete 배치
//! - `/api/{table}/{pk}`: PK 기준 get/put/delete

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use tg_engine::{OperationResult, Record, SingleOutcome, Verb};
use tg_sql::{BatchPayload, Criteria, Row, SelectParams};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 예약된 쿼리 파라미터 (나머지는 모두 조건)
const COLUMNS_PARAM: &str = "columns";
const NUM_ROWS_PARAM: &str = "num_rows";

/// JSON 본문 (거부 사유는 ApiError로 변환)
type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

/// get-multi 응답 본문
#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<Record>,
}

/// GET /api/{table}
pub async fn get_multi(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<RowsResponse>> {
    let params = parse_select_params(query)?;
    let rows = state.executor.get_multi(&table, &params).await?;
    Ok(Json(RowsResponse { rows }))
}

/// POST /api/{table}
pub async fn post_multi(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    payload: JsonBody<BatchPayload>,
) -> Result<Json<OperationResult>> {
    let Json(payload) = payload?;
    mutate_batch(&state, &table, Verb::Post, payload).await
}

/// PUT /api/{table}
pub async fn put_multi(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    payload: JsonBody<BatchPayload>,
) -> Result<Json<OperationResult>> {
    let Json(payload) = payload?;
    mutate_batch(&state, &table, Verb::Put, payload).await
}

/// DELETE /api/{table}
pub async fn delete_multi(
    State(state): State<Arc<AppState>>,
    Path(table): Path<String>,
    payload: JsonBody<BatchPayload>,
) -> Result<Json<OperationResult>> {
    let Json(payload) = payload?;
    mutate_batch(&state, &table, Verb::Delete, payload).await
}

/// GET /api/{table}/{pk}
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path((table, pk)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let outcome = state
        .executor
        .execute_single(&table, &parse_pk(pk), Verb::Get, None)
        .await?;

    match outcome {
        SingleOutcome::Record(record) => Ok(Json(Value::Object(record))),
        SingleOutcome::Applied => Err(ApiError::Internal {
            message: "lookup returned no record".to_string(),
        }),
    }
}

/// PUT /api/{table}/{pk}
pub async fn put_one(
    State(state): State<Arc<AppState>>,
    Path((table, pk)): Path<(String, String)>,
    row: JsonBody<Row>,
) -> Result<Json<Value>> {
    let Json(row) = row?;
    state
        .executor
        .execute_single(&table, &parse_pk(pk), Verb::Put, Some(&row))
        .await?;
    Ok(Json(json!({ "success": 1 })))
}

/// DELETE /api/{table}/{pk}
pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path((table, pk)): Path<(String, String)>,
) -> Result<Json<Value>> {
    state
        .executor
        .execute_single(&table, &parse_pk(pk), Verb::Delete, None)
        .await?;
    Ok(Json(json!({ "success": 1 })))
}

async fn mutate_batch(
    state: &AppState,
    table: &str,
    verb: Verb,
    payload: BatchPayload,
) -> Result<Json<OperationResult>> {
    let result = state
        .executor
        .execute_batch(table, verb, &payload.rows)
        .await?;
    Ok(Json(result))
}

/// 경로의 PK
///
/// 정수 표기와 정확히 일치할 때만 정수로 바인딩합니다. `007`, `+1` 같은 값은
/// 문자열 그대로 두어야 TEXT PK와 비교됩니다. INTEGER PK는 컬럼 affinity가
/// 문자열을 변환합니다.
fn parse_pk(raw: String) -> Value {
    match raw.parse::<i64>() {
        Ok(n) if n.to_string() == raw => Value::from(n),
        _ => Value::String(raw),
    }
}

/// 쿼리 문자열 → SelectParams
///
/// `columns`(쉼표 구분)와 `num_rows`를 제외한 파라미터는 등호 조건이 됩니다.
fn parse_select_params(query: Vec<(String, String)>) -> Result<SelectParams> {
    let mut params = SelectParams::default();
    let mut criteria = Criteria::empty();

    for (key, value) in query {
        match key.as_str() {
            COLUMNS_PARAM => {
                params.columns = value
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            NUM_ROWS_PARAM => {
                let num_rows = value.parse::<u64>().map_err(|_| ApiError::BadRequest {
                    message: format!("num_rows must be a non-negative integer, got {:?}", value),
                })?;
                params.num_rows = Some(num_rows);
            }
            _ => criteria = criteria.eq(key, value),
        }
    }

    params.criteria = criteria;
    Ok(params)
}

//! serde_json 값 바인딩 및 SQLite 행 디코딩

use serde_json::{Map, Number, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// 조회 결과 한 행 (컬럼 -> 값, SELECT 순서 유지)
pub type Record = Map<String, Value>;

/// Statement 파라미터를 순서대로 바인딩
pub fn bind_values<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    values: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in values {
        query = match value {
            Value::Null => query.bind(Option::<String>::None),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query.bind(i)
                } else if n.is_f64() {
                    query.bind(n.as_f64())
                } else {
                    // i64 범위 밖의 정수는 정밀도 손실 없이 텍스트로
                    query.bind(n.to_string())
                }
            }
            Value::String(s) => query.bind(s.clone()),
            Value::Array(_) | Value::Object(_) => query.bind(value.to_string()),
        };
    }
    query
}

pub fn rows_to_records(rows: &[SqliteRow]) -> Result<Vec<Record>, sqlx::Error> {
    rows.iter().map(row_to_record).collect()
}

pub fn row_to_record(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Map::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

/// 값의 실제 저장 클래스(INTEGER/REAL/TEXT/BLOB)에 따라 디코딩
///
/// BLOB은 UTF-8이면 문자열, 아니면 바이트 배열입니다.
fn decode_column(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let storage_class = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_ascii_uppercase()
    };

    let value = match storage_class.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
        // NaN/inf는 JSON으로 표현할 수 없음
        "REAL" => Number::from_f64(row.try_get::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => match String::from_utf8(row.try_get::<Vec<u8>, _>(index)?) {
            Ok(text) => Value::String(text),
            Err(e) => Value::from(e.into_bytes()),
        },
        _ => Value::String(row.try_get::<String, _>(index)?),
    };

    Ok(value)
}

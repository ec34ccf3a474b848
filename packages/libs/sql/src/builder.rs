//! CRUD SQL 빌더
//!
//! TableSchema와 요청 파라미터를 받아 Statement(SQL + 바인딩 값)를 생성합니다.
//! SQL 텍스트에는 검증된 테이블/컬럼 식별자만 들어가며,
//! 요청 값은 모두 `?` 플레이스홀더로 바인딩됩니다.

use sea_query::{Alias, Expr, Order, Query, QueryStatementWriter, SimpleExpr, SqliteQueryBuilder};
use serde_json::Value;

use tg_core::TableSchema;

use crate::error::QueryError;
use crate::params::{Criteria, Row};

/// SELECT 기본 행 수
pub const DEFAULT_ROWS: u64 = 100;

/// 파라미터화된 SQL 문
///
/// `params`는 `sql`의 플레이스홀더와 같은 순서입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// SeaQuery 빌드 결과에서 생성
    fn from_built((sql, values): (String, sea_query::Values)) -> Result<Self, QueryError> {
        let params = values
            .0
            .into_iter()
            .map(sea_to_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sql, params })
    }
}

/// SELECT 쿼리 빌더
pub struct SelectBuilder<'a> {
    table: &'a TableSchema,
    default_limit: u64,
}

impl<'a> SelectBuilder<'a> {
    /// 새 빌더 생성
    pub fn new(table: &'a TableSchema) -> Self {
        Self {
            table,
            default_limit: DEFAULT_ROWS,
        }
    }

    /// limit 미지정 시 사용할 행 수
    pub fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    /// SQL 생성
    ///
    /// # Arguments
    /// * `columns` - SELECT할 컬럼 (비어있으면 전체 허용 컬럼)
    /// * `criteria` - equality 조건 (AND 결합, 입력 순서대로 바인딩)
    /// * `limit` - 최대 행 수 (항상 마지막 파라미터로 바인딩)
    pub fn build(
        &self,
        columns: &[String],
        criteria: &Criteria,
        limit: Option<u64>,
    ) -> Result<Statement, QueryError> {
        let projected: Vec<&str> = if columns.is_empty() {
            self.table.columns().iter().map(|s| s.as_str()).collect()
        } else {
            columns.iter().map(|s| s.as_str()).collect()
        };

        self.table.validate_columns(projected.iter().copied())?;
        self.table.validate_columns(criteria.columns())?;
        criteria.ensure_scalar()?;

        let mut query = Query::select();
        query.from(Alias::new(self.table.name()));

        for column in projected {
            query.column(Alias::new(column));
        }

        for (column, value) in criteria.iter() {
            let col = Expr::col(Alias::new(column));
            let condition = match value {
                // `= NULL`은 어떤 행과도 일치하지 않음
                Value::Null => col.is_null(),
                _ => col.eq(value_to_expr(value)?),
            };
            query.and_where(condition);
        }

        query.order_by(Alias::new(self.table.primary_key_column()), Order::Asc);
        query.limit(limit.unwrap_or(self.default_limit));

        Statement::from_built(query.build(SqliteQueryBuilder))
    }
}

/// INSERT 쿼리 빌더
pub struct InsertBuilder<'a> {
    table: &'a TableSchema,
}

impl<'a> InsertBuilder<'a> {
    pub fn new(table: &'a TableSchema) -> Self {
        Self { table }
    }

    /// SQL 생성 (row의 컬럼 순서대로 바인딩)
    pub fn build(&self, row: &Row) -> Result<Statement, QueryError> {
        ensure_not_empty(self.table, row)?;
        self.table.validate_columns(row.keys().map(|s| s.as_str()))?;

        let mut query = Query::insert();
        query.into_table(Alias::new(self.table.name()));
        query.columns(row.keys().map(Alias::new));
        let values = row
            .values()
            .map(value_to_expr)
            .collect::<Result<Vec<_>, _>>()?;
        query.values(values)?;

        Statement::from_built(query.build(SqliteQueryBuilder))
    }
}

/// UPDATE 쿼리 빌더
pub struct UpdateBuilder<'a> {
    table: &'a TableSchema,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(table: &'a TableSchema) -> Self {
        Self { table }
    }

    /// SQL 생성
    ///
    /// SET 값들이 row 순서대로 바인딩되고, `pk_value`가 마지막 파라미터입니다.
    pub fn build(
        &self,
        row: &Row,
        pk_column: &str,
        pk_value: &Value,
    ) -> Result<Statement, QueryError> {
        ensure_not_empty(self.table, row)?;
        self.table.validate_columns(row.keys().map(|s| s.as_str()))?;
        self.table.validate_columns([pk_column])?;
        ensure_key(pk_column, pk_value)?;

        let mut query = Query::update();
        query.table(Alias::new(self.table.name()));

        // SET 절
        for (column, value) in row {
            query.value(Alias::new(column), value_to_expr(value)?);
        }

        // WHERE 절
        query.and_where(Expr::col(Alias::new(pk_column)).eq(value_to_expr(pk_value)?));

        Statement::from_built(query.build(SqliteQueryBuilder))
    }
}

/// DELETE 쿼리 빌더
pub struct DeleteBuilder<'a> {
    table: &'a TableSchema,
}

impl<'a> DeleteBuilder<'a> {
    pub fn new(table: &'a TableSchema) -> Self {
        Self { table }
    }

    /// SQL 생성 (`WHERE pk_column = ?` 만 사용)
    pub fn build(&self, pk_column: &str, pk_value: &Value) -> Result<Statement, QueryError> {
        self.table.validate_columns([pk_column])?;
        ensure_key(pk_column, pk_value)?;

        let mut query = Query::delete();
        query.from_table(Alias::new(self.table.name()));
        query.and_where(Expr::col(Alias::new(pk_column)).eq(value_to_expr(pk_value)?));

        Statement::from_built(query.build(SqliteQueryBuilder))
    }
}

fn ensure_not_empty(table: &TableSchema, row: &Row) -> Result<(), QueryError> {
    if row.is_empty() {
        return Err(QueryError::EmptyRow {
            table: table.name().to_string(),
        });
    }
    Ok(())
}

/// PK 값은 NULL이 아닌 스칼라여야 함
fn ensure_key(column: &str, value: &Value) -> Result<(), QueryError> {
    let reason = match value {
        Value::Null => "key must not be null",
        Value::Array(_) | Value::Object(_) => "key must be a scalar",
        _ => return Ok(()),
    };
    Err(QueryError::InvalidKey {
        column: column.to_string(),
        reason: reason.to_string(),
    })
}

/// serde_json::Value를 SeaQuery Expr로 변환
///
/// SQLite 정수는 i64이므로 그 범위를 넘는 u64는 거부합니다.
fn value_to_expr(value: &Value) -> Result<SimpleExpr, QueryError> {
    let expr = match value {
        Value::Null => Expr::val(Option::<String>::None).into(),
        Value::Bool(b) => Expr::val(*b).into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Expr::val(i).into()
            } else if n.is_u64() {
                return Err(QueryError::UnsupportedValue(format!(
                    "integer {} is out of range for a 64-bit signed column",
                    n
                )));
            } else if let Some(f) = n.as_f64() {
                Expr::val(f).into()
            } else {
                Expr::val(n.to_string()).into()
            }
        }
        Value::String(s) => Expr::val(s.as_str()).into(),
        Value::Array(_) | Value::Object(_) => {
            // JSON 텍스트로 저장
            Expr::val(value.to_string()).into()
        }
    };
    Ok(expr)
}

/// SeaQuery 바인딩 값을 serde_json::Value로 변환
fn sea_to_json(value: sea_query::Value) -> Result<Value, QueryError> {
    use sea_query::Value as V;

    let json = match value {
        V::Bool(v) => v.map(Value::Bool),
        V::TinyInt(v) => v.map(Value::from),
        V::SmallInt(v) => v.map(Value::from),
        V::Int(v) => v.map(Value::from),
        V::BigInt(v) => v.map(Value::from),
        V::TinyUnsigned(v) => v.map(Value::from),
        V::SmallUnsigned(v) => v.map(Value::from),
        V::Unsigned(v) => v.map(Value::from),
        V::BigUnsigned(v) => v.map(Value::from),
        V::Float(v) => v.map(Value::from),
        V::Double(v) => v.map(Value::from),
        V::String(v) => v.map(|s| Value::String(*s)),
        V::Char(v) => v.map(|c| Value::String(c.to_string())),
        other => return Err(QueryError::UnsupportedValue(format!("{:?}", other))),
    };

    Ok(json.unwrap_or(Value::Null))
}

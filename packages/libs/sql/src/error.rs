//! SQL 빌더 에러

/// 빌더 에러
///
/// 모두 요청 데이터 문제이므로 어떤 SQL도 실행되기 전에 발생합니다.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] tg_core::Error),

    #[error("row for table '{table}' has no columns")]
    EmptyRow { table: String },

    #[error("malformed criteria for column {column}: {reason}")]
    MalformedCriteria { column: String, reason: String },

    #[error("invalid key value for column {column}: {reason}")]
    InvalidKey { column: String, reason: String },

    #[error("unsupported parameter value: {0}")]
    UnsupportedValue(String),

    #[error("failed to build statement: {0}")]
    Build(#[from] sea_query::error::Error),
}

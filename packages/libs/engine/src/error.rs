//! 엔진 에러 타입

use serde::Serialize;
use tg_sql::QueryError;

pub type Result<T> = std::result::Result<T, EngineError>;

/// 에러 분류
///
/// 요청 전체의 실패 사유이자, 배치 결과의 행 단위 에러 종류입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// 실행 전 검증 실패 (아무것도 적용되지 않음)
    #[serde(rename = "ValidationError")]
    Validation,

    /// 테이블 또는 PK에 해당하는 행이 없음
    #[serde(rename = "NotFoundError")]
    NotFound,

    /// 저장소가 SQL 실행을 거부하거나 실패함
    #[serde(rename = "StoreError")]
    Store,
}

/// 엔진 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        EngineError::NotFound {
            message: message.into(),
        }
    }

    /// 에러 분류
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation { .. } => ErrorKind::Validation,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<tg_core::Error> for EngineError {
    fn from(err: tg_core::Error) -> Self {
        match err {
            tg_core::Error::UnknownTable { .. } => EngineError::not_found(err.to_string()),
            _ => EngineError::validation(err.to_string()),
        }
    }
}

impl From<QueryError> for EngineError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Schema(inner) => inner.into(),
            other => EngineError::validation(other.to_string()),
        }
    }
}

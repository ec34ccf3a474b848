//! 공통 에러 타입
//!
//! 스키마 로딩과 테이블/컬럼 검증에서 발생하는 에러를 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Tablegate 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Schema Errors (로딩 시점)
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema parse error: {message}")]
    SchemaParse { message: String },

    #[error("duplicate table name: {name}")]
    DuplicateTable { name: String },

    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("invalid identifier: {name:?}")]
    InvalidIdentifier { name: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookup Errors (요청 시점)
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("unknown table: {name}")]
    UnknownTable { name: String },

    #[error("invalid column '{column}' for table '{table}'")]
    InvalidColumn { table: String, column: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 404 Not Found
            Error::UnknownTable { .. } => 404,

            // 400 Bad Request
            Error::InvalidColumn { .. } => 400,

            // 500 Internal Server Error (스키마는 시작 시점에만 로드됨)
            _ => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::SchemaParse { .. } => "SCHEMA_PARSE_ERROR",
            Error::DuplicateTable { .. } => "DUPLICATE_TABLE",
            Error::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            Error::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Error::UnknownTable { .. } => "TABLE_NOT_FOUND",
            Error::InvalidColumn { .. } => "INVALID_COLUMN",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}

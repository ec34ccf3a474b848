//! 스키마 정의 및 검증
//!
//! # 개요
//!
//! Tablegate가 접근할 수 있는 테이블과 컬럼은 스키마 YAML 파일로 정의됩니다.
//! 이 모듈은 YAML을 파싱하여 읽기 전용 SchemaRegistry를 만들고,
//! 요청에 포함된 테이블/컬럼 이름을 허용 목록과 대조합니다.
//!
//! # 모듈 구조
//!
//! - `table`: 테이블 정의 (이름, PK, 허용 컬럼)
//! - `registry`: SchemaRegistry
//! - `parser`: YAML 파싱 로직

mod parser;
mod registry;
mod table;

pub use parser::SchemaParser;
pub use registry::SchemaRegistry;
pub use table::{TableSchema, DEFAULT_PRIMARY_KEY};

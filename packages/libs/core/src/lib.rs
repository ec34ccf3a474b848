//! tg-core: Tablegate 공통 핵심 라이브러리
//!
//! SQL 빌더(tg-sql), 실행 엔진(tg-engine), API 서버(tg-api)가 공유하는
//! 스키마 모델과 에러 타입을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `schema`: 스키마(YAML) 파싱 및 테이블/컬럼 허용 목록(SchemaRegistry)
//! - `error`: 공통 에러 타입

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use schema::{SchemaParser, SchemaRegistry, TableSchema};

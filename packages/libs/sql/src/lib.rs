//! tg-sql: 파라미터 바인딩 기반 CRUD SQL 생성 라이브러리
//!
//! SchemaRegistry로 검증된 테이블/컬럼 정보를 기반으로 런타임에 SQL을 생성합니다.
//! SeaQuery로 SQL 텍스트를 만들고, 값은 항상 바인딩 파라미터로만 전달합니다.
//!
//! # 모듈 구조
//!
//! - `builder`: CRUD SQL 빌더 (Statement 생성)
//! - `params`: 요청 파라미터 (Row, Criteria, SelectParams, BatchPayload)
//! - `error`: 빌더 에러

pub mod builder;
pub mod error;
pub mod params;

pub use builder::{DeleteBuilder, InsertBuilder, SelectBuilder, Statement, UpdateBuilder};
pub use error::QueryError;
pub use params::{BatchPayload, Criteria, Row, SelectParams};

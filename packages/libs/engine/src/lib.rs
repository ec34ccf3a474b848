//! tg-engine: 배치 CRUD 실행 엔진
//!
//! tg-sql이 만든 Statement를 하나의 커넥션 위에서 순차 실행하고,
//! 행 단위 성공/실패를 OperationResult로 집계합니다.
//!
//! # 모듈 구조
//!
//! - `executor`: BatchExecutor (단건/배치/다건 조회)
//! - `scope`: ConnectionScope (커넥션 획득, 커밋, 반환)
//! - `decode`: serde_json 값 바인딩 및 행 디코딩
//! - `result`: OperationResult, 행 단위 에러
//! - `verb`: 요청 동사 (GET/POST/PUT/DELETE)
//! - `error`: 엔진 에러

pub mod decode;
pub mod error;
pub mod executor;
pub mod result;
pub mod scope;
pub mod verb;

pub use decode::Record;
pub use error::{EngineError, ErrorKind, Result};
pub use executor::{BatchExecutor, Limits, SingleOutcome};
pub use result::{OperationResult, RowError};
pub use scope::ConnectionScope;
pub use verb::Verb;

#[cfg(test)]
pub(crate) mod testing;

//! CRUD 요청 파라미터
//!
//! 조회 조건(Criteria), 변경할 행(Row), 배치 요청 본문을 정의합니다.
//! JSON 객체의 키 순서는 그대로 보존되며, 이 순서가 바인딩 파라미터 순서가 됩니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QueryError;

/// 변경 요청의 한 행 (컬럼 -> 값, 입력 순서 유지)
pub type Row = Map<String, Value>;

/// 조회 조건
///
/// 컬럼별 equality 조건이며, 모든 조건은 AND로 결합됩니다.
///
/// # 예시
///
/// ```json
/// { "co_name": "TestCorp", "pbid": 7 }   // co_name = ? AND pbid = ?
/// { "weburl": null }                     // weburl IS NULL
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(pub Map<String, Value>);

impl Criteria {
    /// 빈 조건
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// 조건이 비어있는지
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// equality 조건 추가
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// 조건에 사용된 컬럼 이름 (입력 순서)
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|s| s.as_str())
    }

    /// (컬럼, 값) 쌍 (입력 순서)
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// 모든 값이 스칼라인지 검사
    ///
    /// 배열/객체는 equality 비교 대상이 아니므로 거부합니다.
    pub fn ensure_scalar(&self) -> Result<(), QueryError> {
        for (column, value) in &self.0 {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                return Err(QueryError::MalformedCriteria {
                    column: column.clone(),
                    reason: "expected a scalar value".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl From<Map<String, Value>> for Criteria {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// get-multi 요청 파라미터
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectParams {
    /// SELECT할 컬럼 목록 (비어있으면 전체 허용 컬럼)
    #[serde(default)]
    pub columns: Vec<String>,

    /// WHERE 조건
    #[serde(default)]
    pub criteria: Criteria,

    /// 최대 행 수 (없으면 기본값)
    #[serde(default)]
    pub num_rows: Option<u64>,
}

/// post/put/delete-multi 요청 본문
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchPayload {
    /// 변경할 행 목록 (delete는 PK만 있으면 됨)
    #[serde(default)]
    pub rows: Vec<Row>,
}

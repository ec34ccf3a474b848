//! 배치 실행 결과

use serde::Serialize;
use serde_json::Value;

use crate::error::ErrorKind;

/// 배치 실행 결과
///
/// 성공한 행 수와 실패한 행별 에러를 함께 담습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationResult {
    #[serde(rename = "success")]
    pub success_count: u64,

    pub errors: Vec<RowError>,
}

/// 행 단위 에러
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    /// 요청 내 행 위치 (0부터)
    pub row_index: usize,

    /// 행의 PK 값 (있을 때)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_key: Option<Value>,

    pub error_kind: ErrorKind,

    pub message: String,
}

impl OperationResult {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(
        &mut self,
        row_index: usize,
        row_key: Option<Value>,
        error_kind: ErrorKind,
        message: impl Into<String>,
    ) {
        self.errors.push(RowError {
            row_index,
            row_key,
            error_kind,
            message: message.into(),
        });
    }

    /// 실패한 행이 하나라도 있는지
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

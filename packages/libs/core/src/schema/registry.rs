//! SchemaRegistry
//!
//! 유효한 테이블, 테이블별 허용 컬럼, PK 컬럼 이름을 보관합니다.
//! I/O 없이 검증만 수행하며, 생성 이후에는 읽기 전용이므로
//! `Arc`로 감싸 여러 요청에서 동시에 공유할 수 있습니다.

use std::collections::HashMap;

use super::table::TableSchema;
use crate::error::{Error, Result};

/// 테이블 스키마 레지스트리
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: HashMap<String, TableSchema>,
}

impl SchemaRegistry {
    /// 빈 레지스트리 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 테이블 목록으로 레지스트리 생성 (이름 중복 검사)
    pub fn from_tables(tables: impl IntoIterator<Item = TableSchema>) -> Result<Self> {
        let mut registry = Self::new();
        for table in tables {
            if registry.tables.contains_key(table.name()) {
                return Err(Error::DuplicateTable {
                    name: table.name().to_string(),
                });
            }
            registry.tables.insert(table.name().to_string(), table);
        }
        Ok(registry)
    }

    /// 테이블 존재 여부
    pub fn table_exists(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// 테이블 조회
    pub fn table(&self, table: &str) -> Result<&TableSchema> {
        self.tables.get(table).ok_or_else(|| Error::UnknownTable {
            name: table.to_string(),
        })
    }

    /// 컬럼 검증
    ///
    /// 테이블 존재 여부를 먼저 확인하므로, 알 수 없는 테이블은 컬럼 검사 전에
    /// `UnknownTable`로 실패합니다.
    pub fn validate_columns<'a, I>(&self, table: &str, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.table(table)?.validate_columns(columns)
    }

    /// PK 컬럼 이름
    pub fn primary_key_column(&self, table: &str) -> Result<&str> {
        Ok(self.table(table)?.primary_key_column())
    }

    /// 모든 테이블 이름 (정렬됨)
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// 등록된 테이블 수
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

//! 테이블 정의
//!
//! 테이블 이름, PK 컬럼, 허용 컬럼 목록을 담는 불변 구조체입니다.

use crate::error::{Error, Result};

/// PK 컬럼 기본 이름
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// 테이블 스키마
///
/// 시작 시점에 한 번 생성되며 이후 변경되지 않습니다.
/// PK 컬럼은 항상 허용 컬럼 목록에 포함됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    primary_key: String,

    /// 허용 컬럼 (선언 순서 유지, PK 포함)
    columns: Vec<String>,
}

impl TableSchema {
    /// 새 테이블 스키마 생성
    ///
    /// `primary_key`가 없으면 `id`를 사용합니다. PK가 `columns`에 없으면
    /// 맨 앞에 추가합니다.
    pub fn new(
        name: impl Into<String>,
        primary_key: Option<String>,
        columns: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        ensure_identifier(&name)?;

        let primary_key = primary_key.unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string());
        ensure_identifier(&primary_key)?;

        let mut ordered: Vec<String> = Vec::with_capacity(columns.len() + 1);
        if !columns.contains(&primary_key) {
            ordered.push(primary_key.clone());
        }

        for column in columns {
            ensure_identifier(&column)?;
            if ordered.contains(&column) {
                return Err(Error::DuplicateColumn {
                    table: name,
                    column,
                });
            }
            ordered.push(column);
        }

        Ok(Self {
            name,
            primary_key,
            columns: ordered,
        })
    }

    /// 테이블 이름
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 허용 컬럼 목록 (선언 순서)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// PK 컬럼 이름
    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }

    /// 컬럼 허용 여부
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// 모든 컬럼이 허용 목록에 있는지 검사
    ///
    /// 허용되지 않은 첫 번째 컬럼에서 `InvalidColumn`으로 실패합니다.
    pub fn validate_columns<'a, I>(&self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for column in columns {
            if !self.has_column(column) {
                return Err(Error::InvalidColumn {
                    table: self.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// SQL 식별자 형식 검사 (`[A-Za-z_][A-Za-z0-9_]*`)
fn ensure_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_primary_key_is_prepended() {
        let table = TableSchema::new("person", None, cols(&["name", "email"])).unwrap();
        assert_eq!(table.name(), "person");
        assert_eq!(table.primary_key_column(), "id");
        assert_eq!(table.columns(), &cols(&["id", "name", "email"])[..]);
    }

    #[test]
    fn test_explicit_primary_key_keeps_order() {
        let table = TableSchema::new(
            "company",
            Some("entity_id".to_string()),
            cols(&["co_name", "entity_id", "pbid"]),
        )
        .unwrap();
        assert_eq!(table.primary_key_column(), "entity_id");
        assert_eq!(table.columns(), &cols(&["co_name", "entity_id", "pbid"])[..]);
    }

    #[test]
    fn test_validate_columns() {
        let table = TableSchema::new("person", None, cols(&["name", "email"])).unwrap();
        assert!(table.validate_columns(["id", "name"]).is_ok());
        assert!(table.validate_columns(Vec::<&str>::new()).is_ok());

        let err = table.validate_columns(["name", "salary"]).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn { column, .. } if column == "salary"));
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        assert!(TableSchema::new("bad name", None, vec![]).is_err());
        assert!(TableSchema::new("person", None, cols(&["1st"])).is_err());
        assert!(TableSchema::new("person", None, cols(&["name; DROP"])).is_err());
        assert!(TableSchema::new("person", Some(String::new()), vec![]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = TableSchema::new("person", None, cols(&["name", "name"])).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { .. }));
    }
}

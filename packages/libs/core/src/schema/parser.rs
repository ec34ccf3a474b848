//! 스키마 YAML 파서
//!
//! 스키마 파일을 파싱하여 SchemaRegistry를 생성합니다.
//!
//! ```yaml
//! tables:
//!   company:
//!     primary_key: entity_id
//!     columns: [entity_id, co_name, pbid, weburl]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::registry::SchemaRegistry;
use super::table::TableSchema;
use crate::error::{Error, Result};

/// 스키마 파서
pub struct SchemaParser;

impl SchemaParser {
    /// YAML 문자열 파싱
    pub fn parse_yaml(yaml: &str) -> Result<SchemaRegistry> {
        let raw: RawSchema = serde_yaml::from_str(yaml)?;
        Self::convert_raw_schema(raw)
    }

    /// YAML 파일 로드
    pub fn load(path: impl AsRef<Path>) -> Result<SchemaRegistry> {
        let yaml = std::fs::read_to_string(path)?;
        Self::parse_yaml(&yaml)
    }

    /// Raw 스키마를 레지스트리로 변환
    fn convert_raw_schema(raw: RawSchema) -> Result<SchemaRegistry> {
        if raw.tables.is_empty() {
            return Err(Error::SchemaParse {
                message: "schema declares no tables".to_string(),
            });
        }

        let mut tables = Vec::with_capacity(raw.tables.len());
        for (name, raw_table) in raw.tables {
            if raw_table.columns.is_empty() {
                return Err(Error::SchemaParse {
                    message: format!("table '{}' declares no columns", name),
                });
            }
            tables.push(TableSchema::new(
                name,
                raw_table.primary_key,
                raw_table.columns,
            )?);
        }

        SchemaRegistry::from_tables(tables)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw YAML 구조체 (serde 역직렬화용)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSchema {
    tables: BTreeMap<String, RawTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    primary_key: Option<String>,
    columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_schema() {
        let yaml = r#"
tables:
  company:
    primary_key: entity_id
    columns: [entity_id, co_name, pbid, weburl]
  person:
    columns:
      - name
      - email
"#;

        let registry = SchemaParser::parse_yaml(yaml).unwrap();
        assert_eq!(registry.len(), 2);

        let company = registry.table("company").unwrap();
        assert_eq!(company.primary_key_column(), "entity_id");
        assert_eq!(company.columns().len(), 4);

        let person = registry.table("person").unwrap();
        assert_eq!(person.primary_key_column(), "id");
        assert_eq!(person.columns()[0], "id");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let yaml = r#"
tables:
  person:
    columns: [name]
    indexes: [name]
"#;
        assert!(matches!(
            SchemaParser::parse_yaml(yaml),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_columns() {
        let yaml = r#"
tables:
  person:
    columns: []
"#;
        assert!(matches!(
            SchemaParser::parse_yaml(yaml),
            Err(Error::SchemaParse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_empty_schema() {
        assert!(SchemaParser::parse_yaml("tables: {}").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_column_name() {
        let yaml = r#"
tables:
  person:
    columns: ["name", "x\"; DROP TABLE person; --"]
"#;
        assert!(matches!(
            SchemaParser::parse_yaml(yaml),
            Err(Error::InvalidIdentifier { .. })
        ));
    }
}

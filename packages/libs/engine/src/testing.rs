//! 테스트용 인메모리 SQLite 픽스처

use std::sync::Arc;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tg_core::{SchemaRegistry, TableSchema};

/// 단일 커넥션 인메모리 풀 (커넥션이 닫히면 DB도 사라지므로 수명 제한 없음)
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    for ddl in [
        "CREATE TABLE company (
            entity_id TEXT PRIMARY KEY,
            co_name TEXT NOT NULL UNIQUE,
            pbid TEXT,
            weburl TEXT
        )",
        "CREATE TABLE person (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE
        )",
    ] {
        sqlx::query(ddl).execute(&pool).await.unwrap();
    }

    pool
}

pub(crate) fn registry() -> Arc<SchemaRegistry> {
    let columns = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
    Arc::new(
        SchemaRegistry::from_tables([
            TableSchema::new(
                "company",
                Some("entity_id".to_string()),
                columns(&["entity_id", "co_name", "pbid", "weburl"]),
            )
            .unwrap(),
            TableSchema::new("person", None, columns(&["name", "email"])).unwrap(),
        ])
        .unwrap(),
    )
}

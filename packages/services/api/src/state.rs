//! API 앱 상태

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tg_core::SchemaParser;
use tg_engine::BatchExecutor;

use crate::config::Config;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. 요청 간에 바뀌는 값은 없습니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// CRUD 실행기 (스키마 레지스트리 + 커넥션 풀)
    pub executor: BatchExecutor,
}

impl AppState {
    /// 스키마 로드 및 커넥션 풀 생성
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let registry = SchemaParser::load(&config.schema_path)?;
        tracing::info!(
            "Loaded {} tables from {}: {:?}",
            registry.len(),
            config.schema_path,
            registry.table_names()
        );

        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::with_executor(
            config,
            BatchExecutor::new(Arc::new(registry), pool, config.limits()),
        ))
    }

    pub fn with_executor(config: &Config, executor: BatchExecutor) -> Self {
        Self {
            config: config.clone(),
            executor,
        }
    }
}

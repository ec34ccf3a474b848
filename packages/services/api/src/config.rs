//! API 서버 설정

use std::env;

/// API 서버 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// SQLite 연결 문자열
    pub database_url: String,

    /// 테이블 스키마 YAML 경로
    pub schema_path: String,

    /// 요청당 최대 행 수 (배치, 조회 공통)
    pub max_rows: u64,

    /// 조회 시 기본 행 수
    pub default_rows: u64,

    /// 커넥션 풀 크기
    pub max_connections: u32,

    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            port: env::var("TG_API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,

            database_url: env::var("TG_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://tablegate.db".to_string()),

            schema_path: env::var("TG_SCHEMA_PATH").unwrap_or_else(|_| "schema.yaml".to_string()),

            max_rows: env::var("TG_MAX_ROWS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()?,

            default_rows: env::var("TG_DEFAULT_ROWS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,

            max_connections: env::var("TG_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            request_timeout_secs: env::var("TG_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        };
        config.validate()?;
        Ok(config)
    }

    /// 행 수 제한 검증
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_rows == 0 {
            anyhow::bail!("TG_MAX_ROWS must be greater than zero");
        }
        if self.default_rows > self.max_rows {
            anyhow::bail!(
                "TG_DEFAULT_ROWS ({}) must not exceed TG_MAX_ROWS ({})",
                self.default_rows,
                self.max_rows
            );
        }
        Ok(())
    }

    pub fn limits(&self) -> tg_engine::Limits {
        tg_engine::Limits {
            max_rows: self.max_rows,
            default_rows: self.default_rows,
        }
    }
}

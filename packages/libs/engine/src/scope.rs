//! ConnectionScope
//!
//! 요청 하나가 사용하는 커넥션과 트랜잭션의 수명을 관리합니다.
//! `release`는 작업 결과와 관계없이 한 번만 커밋하고 커넥션을 풀에 돌려줍니다.
//! `release` 전에 future가 취소되거나 panic이 나면 트랜잭션은 롤백되고
//! 커넥션은 drop 시점에 풀로 반환됩니다.

use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::{Sqlite, Transaction};

use crate::error::{EngineError, Result};

/// 커넥션 스코프
pub struct ConnectionScope {
    tx: Transaction<'static, Sqlite>,
}

impl ConnectionScope {
    /// 풀에서 커넥션을 얻고 트랜잭션 시작
    pub async fn acquire(pool: &SqlitePool) -> Result<Self> {
        let tx = pool.begin().await?;
        tracing::trace!("connection scope opened");
        Ok(Self { tx })
    }

    /// 스코프의 커넥션
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// 커밋 후 커넥션 반환
    ///
    /// `outcome`이 에러여도 커밋합니다. 작업이 성공했는데 커밋이 실패하면
    /// `Store` 에러를, 작업이 이미 실패했다면 원래 에러를 돌려줍니다.
    pub async fn release<T>(self, outcome: Result<T>) -> Result<T> {
        let committed = self.tx.commit().await;
        tracing::trace!(committed = committed.is_ok(), "connection scope released");

        match (outcome, committed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(EngineError::Store(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(commit_err)) => {
                tracing::error!("Commit failed after request error: {:?}", commit_err);
                Err(e)
            }
        }
    }
}

//! Tablegate API
//!
//! YAML로 선언한 테이블들에 대해 `/api/{table}` CRUD 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod state;

use config::Config;
use handlers::{crud, health};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "tg_api=debug,tg_engine=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting Tablegate with config: {:?}", config);

    // 앱 상태 초기화 (스키마, 커넥션 풀)
    let state = Arc::new(AppState::new(&config).await?);

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Tablegate listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
///
/// 메서드마다 고정된 Verb의 핸들러를 연결합니다.
fn create_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // 조회 + 배치 변경
        .route(
            "/api/:table",
            get(crud::get_multi)
                .post(crud::post_multi)
                .put(crud::put_multi)
                .delete(crud::delete_multi),
        )
        // PK 기준 단건
        .route(
            "/api/:table/:pk",
            put(crud::put_one).get(crud::get_one).delete(crud::delete_one),
        )
        // Health check
        .route("/health", get(health::health_check))
        // Middleware
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}

//! API 미들웨어
//!
//! 요청마다 ID를 발급해 로그, 에러 본문, 응답 헤더에 싣습니다.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 현재 요청의 ID (미들웨어 밖에서는 None)
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let span = tracing::debug_span!("request", request_id = %id);

    let mut resp = REQUEST_ID
        .scope(id.clone(), async move { next.run(req).await })
        .instrument(span)
        .await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/health` → `{ "status": "ok", "timestamp": "..." }`
//!
//! 인증이 필요 없습니다. 로드밸런서나 컨테이너 헬스체크에서 사용합니다.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::validation::format_timestamp;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": format_timestamp(Utc::now())
    }))
}

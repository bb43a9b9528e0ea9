//! # 애플리케이션 공유 상태
//!
//! 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
//! DB 풀은 `main`에서 한 번 만들어 여기에 담아 주입합니다. 전역 싱글톤은 없습니다.

use sqlx::SqlitePool;

use crate::config::Config;

/// 핸들러와 추출기(extractor)가 공유하는 의존성
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// 토큰 서명/검증용 비밀키
    pub jwt_secret: String,
    /// 토큰 유효 시간(시간 단위)
    pub jwt_ttl_hours: i64,
    /// 업로드 가능한 PDF 최대 바이트 수
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            jwt_ttl_hours: config.jwt_ttl_hours,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 조립을 담당합니다.
//! 모든 API는 `/api` 아래에 있고, `health`, `auth/register`, `auth/login`을 제외하면
//! 핸들러가 `AuthUser` 추출기를 받으므로 토큰 없이는 실행되지 않습니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 내 정보
//! - `health`: 서버 상태 확인
//! - `topics`, `videos`, `schedule`, `bookmarks`, `notes`: 엔티티 CRUD
//! - `study_guides`: PDF 업로드/조회와 메타데이터 CRUD
//! - `progress`: 학습 진행도
//! - `search`: 통합 검색

pub mod auth;
pub mod bookmarks;
pub mod health;
pub mod notes;
pub mod progress;
pub mod schedule;
pub mod search;
pub mod study_guides;
pub mod topics;
pub mod videos;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, db::topics as db_topics, error::AppError, state::AppState};

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// `main`과 통합 테스트가 같은 라우터를 사용합니다.
pub fn router(state: AppState, config: &Config) -> Router {
    // 업로드 본문은 `services::pdf::read_upload`가 필드별로 세면서 제한합니다.
    // 고정 본문 제한을 걸면 PDF가 아닌 큰 파일도 형식 검사 전에 413이 됩니다.
    let upload_limit = DefaultBodyLimit::disable();

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        // 인증
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // 토픽
        .route("/topics", get(topics::list_topics).post(topics::create_topic))
        .route(
            "/topics/{id}",
            get(topics::get_topic)
                .put(topics::update_topic)
                .delete(topics::delete_topic),
        )
        // 학습 가이드: 업로드 라우트만 기본 본문 제한을 끕니다.
        .route(
            "/study-guides",
            get(study_guides::list_study_guides)
                .post(study_guides::upload_study_guide)
                .layer(upload_limit),
        )
        .route(
            "/study-guides/upload",
            post(study_guides::upload_study_guide).layer(upload_limit),
        )
        .route("/study-guides/migrate", post(study_guides::migrate_study_guides))
        .route(
            "/study-guides/{id}",
            get(study_guides::get_study_guide)
                .put(study_guides::update_study_guide)
                .delete(study_guides::delete_study_guide),
        )
        .route("/study-guides/{id}/file", get(study_guides::get_study_guide_file))
        // 영상
        .route("/videos", get(videos::list_videos).post(videos::create_video))
        .route(
            "/videos/{id}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        // 일정
        .route(
            "/schedule",
            get(schedule::list_schedule).post(schedule::create_schedule_item),
        )
        .route(
            "/schedule/{id}",
            get(schedule::get_schedule_item)
                .put(schedule::update_schedule_item)
                .delete(schedule::delete_schedule_item),
        )
        // 북마크
        .route(
            "/bookmarks",
            get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark),
        )
        .route(
            "/bookmarks/{id}",
            get(bookmarks::get_bookmark)
                .put(bookmarks::update_bookmark)
                .delete(bookmarks::delete_bookmark),
        )
        // 노트
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        // 진행도, 검색
        .route(
            "/study-progress",
            get(progress::get_progress).put(progress::update_progress),
        )
        .route("/search", get(search::search))
        .with_state(state);

    let app = Router::new().nest("/api", api_routes);

    let app = match config.frontend_dist.as_deref() {
        Some(dist) if Path::new(dist).exists() => {
            tracing::info!("Serving frontend static files from {}", dist);
            let serve_dir = ServeDir::new(dist)
                .not_found_service(ServeFile::new(Path::new(dist).join("index.html")));
            app.fallback_service(serve_dir)
        }
        Some(dist) => {
            tracing::warn!("Frontend dist directory {} not found, serving API only", dist);
            app
        }
        None => app,
    };

    app.layer(cors_layer(&config.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// 설정된 출처만 허용하는 CORS 레이어
///
/// 헤더 값으로 쓸 수 없는 출처는 경고를 남기고 건너뜁니다.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// 요청에 `topicId`가 있으면 호출자의 토픽인지 확인합니다.
pub(crate) async fn ensure_topic(
    state: &AppState,
    user_id: &str,
    topic_id: Option<&str>,
) -> Result<(), AppError> {
    let Some(topic_id) = topic_id else {
        return Ok(());
    };
    if db_topics::topic_belongs_to(&state.pool, user_id, topic_id).await? {
        Ok(())
    } else {
        Err(AppError::field("topicId", "must reference one of your topics"))
    }
}

/// 삭제 성공 응답: `{ "message": "<Entity> deleted successfully" }`
pub(crate) fn deleted(entity: &str) -> Json<Value> {
    Json(json!({ "message": format!("{entity} deleted successfully") }))
}

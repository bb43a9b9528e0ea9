//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 모든 쿼리는 `user_id`로 범위가 제한됩니다. 다른 사용자의 레코드는
//! "없음"과 구별되지 않습니다.
//!
//! 각 하위 모듈:
//! - `users`: 사용자 조회/생성
//! - `topics`: 토픽 CRUD와 소유권 확인
//! - `study_guides`: 학습 가이드 메타데이터 CRUD와 PDF 페이로드 접근
//! - `videos`, `schedule`, `bookmarks`, `notes`: 각 엔티티 CRUD
//! - `progress`: 사용자별 진행도 (지연 생성)

pub mod bookmarks;
pub mod notes;
pub mod progress;
pub mod schedule;
pub mod study_guides;
pub mod topics;
pub mod users;
pub mod videos;

use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// `./migrations`의 SQL 파일을 컴파일 타임에 포함합니다.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 설정된 URL로 연결 풀을 엽니다. 파일이 없으면 새로 만듭니다.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// 마이그레이션이 적용된 인메모리 DB
///
/// 인메모리 SQLite는 연결마다 별개의 DB이므로 연결을 하나로 고정하고
/// 유휴 연결이 닫히지 않게 합니다.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

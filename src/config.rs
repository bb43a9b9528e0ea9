//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져오며, 설정 파일 포맷은 없습니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 토큰 서명에 사용할 비밀키 (필수)
//! - `JWT_TTL_HOURS`: 토큰 유효 시간 (기본 168시간 = 7일, 1..=87600)
//! - `CORS_ORIGINS`: 쉼표로 구분된 허용 출처 목록
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트
//! - `MAX_UPLOAD_BYTES`: PDF 업로드 최대 크기 (기본 50 MiB)
//! - `REQUEST_TIMEOUT_SECS`: 요청 단위 타임아웃
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 디렉토리 (선택)

use std::{env, ops::RangeInclusive, str::FromStr, time::Duration};

use thiserror::Error;

/// 업로드 최대 크기 기본값: 50 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// 토큰 유효 시간으로 받아들이는 범위 (1시간 ~ 10년)
pub const JWT_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=87_600;

/// 개발 환경용 기본 CORS 허용 출처 (Vite 개발 서버, 로컬 서버)
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5000";

/// 설정 로딩 중 발생할 수 있는 에러
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경변수가 없음
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// 값은 있지만 파싱할 수 없음 (예: PORT=abc)
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// `AppState`를 통해 핸들러들과 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/studyhub.db")
    pub database_url: String,
    /// 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 토큰 유효 시간(시간 단위). 갱신(refresh)은 없으며 만료되면 재로그인합니다.
    pub jwt_ttl_hours: i64,
    /// CORS 허용 출처 목록. 소스에 하드코딩하지 않고 환경변수로만 관리합니다.
    pub cors_origins: Vec<String>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 5000)
    pub port: u16,
    /// 업로드 가능한 PDF의 최대 바이트 수 (이 값 자체는 허용, +1부터 거부)
    pub max_upload_bytes: usize,
    /// 요청 하나가 처리될 수 있는 최대 시간
    pub request_timeout: Duration,
    /// 빌드된 프론트엔드 파일 경로. 없으면 API만 서빙합니다.
    pub frontend_dist: Option<String>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`이 없거나,
    /// 숫자형 설정값이 파싱되지 않으면 `ConfigError`를 반환합니다.
    /// 값이 잘못된 경우 조용히 기본값으로 바꾸지 않고 시작을 중단합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: within(
                "JWT_TTL_HOURS",
                parsed("JWT_TTL_HOURS", 168)?,
                JWT_TTL_HOURS_RANGE,
            )?,
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", 5000)?,
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            request_timeout: Duration::from_secs(parsed("REQUEST_TIMEOUT_SECS", 60)?),
            frontend_dist: env::var("FRONTEND_DIST").ok().filter(|s| !s.trim().is_empty()),
        })
    }
}

/// 필수 환경변수를 읽습니다. 비어 있는 값도 없는 것으로 취급합니다.
fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// 선택 환경변수를 읽어 `T`로 파싱합니다.
/// 변수가 없으면 `default`를, 있는데 파싱에 실패하면 에러를 반환합니다.
fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

/// 파싱된 값이 허용 범위 안에 있는지 확인합니다.
fn within<T>(key: &'static str, value: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: PartialOrd + ToString,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

/// "a, b,,c" → ["a", "b", "c"]
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_origins(" http://a.test/ ,, https://b.test ");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn token_lifetime_must_stay_in_range() {
        assert_eq!(within("JWT_TTL_HOURS", 168, JWT_TTL_HOURS_RANGE).unwrap(), 168);
        assert!(within("JWT_TTL_HOURS", 87_600, JWT_TTL_HOURS_RANGE).is_ok());

        for bad in [0, -5, 87_601, 10_000_000_000] {
            let err = within("JWT_TTL_HOURS", bad, JWT_TTL_HOURS_RANGE).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid { key: "JWT_TTL_HOURS", ref value } if *value == bad.to_string()
            ));
        }
    }

    #[test]
    fn empty_origin_list_allows_nothing() {
        assert!(parse_origins("").is_empty());
    }
}

//! 통합 테스트 공용 도우미: 인메모리 DB 위에 실제 라우터를 조립하고
//! `oneshot`으로 요청을 보냅니다.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use studyhub::{
    config::{Config, DEFAULT_MAX_UPLOAD_BYTES},
    db,
    routes,
    state::AppState,
};

pub const BOUNDARY: &str = "studyhub-test-boundary";

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        if self.bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.bytes).expect("response body is JSON")
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_hours: 1,
        cors_origins: vec!["http://localhost:5173".to_string()],
        host: "127.0.0.1".to_string(),
        port: 0,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        request_timeout: Duration::from_secs(60),
        frontend_dist: None,
    }
}

pub async fn app() -> Router {
    app_with(test_config()).await
}

pub async fn app_with(config: Config) -> Router {
    let pool = db::memory_pool().await.expect("in-memory database");
    routes::router(AppState::new(pool, &config), &config)
}

pub async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec();
    Reply { status, headers, bytes }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Reply {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> Reply {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put(app: &Router, uri: &str, token: &str, body: Value) -> Reply {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Reply {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// 가입 후 로그인해서 토큰을 돌려줍니다.
pub async fn signup(app: &Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": "secret1", "name": "Tester" });
    let reply = send(app, request(Method::POST, "/api/auth/register", None, Some(body))).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{:?}", reply.json());

    let body = serde_json::json!({ "email": email, "password": "secret1" });
    let reply = send(app, request(Method::POST, "/api/auth/login", None, Some(body))).await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.json()["token"].as_str().unwrap().to_string()
}

/// multipart 본문의 한 부분
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File { name, file_name, content_type, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn upload(app: &Router, uri: &str, token: &str, parts: &[Part<'_>]) -> Reply {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

pub fn pdf<'a>(file_name: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "pdf",
        file_name,
        content_type: "application/pdf",
        bytes,
    }
}

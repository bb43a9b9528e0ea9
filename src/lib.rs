//! # Studyhub 백엔드
//!
//! 학습 계획 웹 애플리케이션의 REST API입니다.
//! 사용자별로 토픽, 학습 가이드(PDF), 영상 링크, 일정, 북마크, 노트, 학습 진행도를 관리합니다.
//!
//! 실행 파일(`main.rs`)과 통합 테스트(`tests/`)가 모두 이 라이브러리의
//! `routes::router`로 같은 애플리케이션을 조립합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

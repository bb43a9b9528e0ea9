//! 요청 전처리: Bearer 토큰 검증

pub mod auth;

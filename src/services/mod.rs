//! # 비즈니스 로직 모듈
//!
//! - `accounts`: 회원가입/로그인 (비밀번호 해싱과 검증)
//! - `pdf`: PDF 업로드/조회 파이프라인과 레거시 이관
//! - `search`: 통합 검색

pub mod accounts;
pub mod pdf;
pub mod search;

//! # 학습 일정(ScheduleItem) 모델 정의
//!
//! 일정은 시작/종료 시각과 진행 상태를 가집니다.
//!
//! ## 시각 저장 형식
//! 요청에서는 임의의 RFC 3339 문자열(시간대 포함)을 받고,
//! 저장할 때는 `YYYY-MM-DDTHH:MM:SS.mmmZ` UTC 형식으로 정규화합니다.
//! 같은 형식의 문자열은 사전순 비교가 시간순 비교와 같기 때문에
//! SQL의 `ORDER BY start_time`과 날짜 범위 필터가 그대로 동작합니다.
//!
//! ## 시간 순서 불변식
//! `startTime < endTime`은 서버에서 생성과 수정 모두에 대해 검사합니다.
//! 수정은 병합된 결과를 기준으로 검사하므로, 한쪽 시각만 바꿔도 역전된 구간은 거부됩니다.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use validator::{Validate, ValidationError, ValidationErrors};

use super::double_option;
use crate::validation::{
    datetime, format_timestamp, invalid, not_blank, parse_datetime, rule_violation, FieldError,
};

/// 일정 진행 상태
///
/// JSON과 DB 모두 `"not-started"`, `"in-progress"`, `"completed"` 문자열로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    #[default]
    #[sqlx(rename = "not-started")]
    NotStarted,
    #[sqlx(rename = "in-progress")]
    InProgress,
    #[sqlx(rename = "completed")]
    Completed,
}

/// 저장된 일정은 병합 후에도 `startTime < endTime`을 만족해야 합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_stored_interval"))]
pub struct ScheduleItem {
    pub id: String,
    pub user_id: String,
    pub topic_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub status: ScheduleStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// 두 시각이 모두 파싱될 때만 `schema` 검사(구간 순서)가 실행됩니다.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "check_requested_interval"))]
pub struct CreateScheduleItemRequest {
    pub topic_id: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "datetime"))]
    pub start_time: String,
    #[validate(custom(function = "datetime"))]
    pub end_time: String,
    pub status: Option<ScheduleStatus>,
}

fn check_requested_interval(req: &CreateScheduleItemRequest) -> Result<(), ValidationError> {
    forward_interval(&req.start_time, &req.end_time)
}

fn check_stored_interval(item: &ScheduleItem) -> Result<(), ValidationError> {
    forward_interval(&item.start_time, &item.end_time)
}

fn forward_interval(start: &str, end: &str) -> Result<(), ValidationError> {
    match (parse_datetime(start), parse_datetime(end)) {
        (Some(start), Some(end)) if start < end => Ok(()),
        _ => Err(rule_violation("endTime", "must be after startTime")),
    }
}

/// 검증을 통과한 생성 요청을 저장 형식으로 바꾼 값
#[derive(Debug, Clone)]
pub struct NewScheduleItem {
    pub topic_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub status: ScheduleStatus,
}

impl NewScheduleItem {
    /// 시각을 정규화합니다. 이미 검증된 요청이라면 실패하지 않지만,
    /// 파싱에 실패하면 검증 에러를 그대로 돌려줍니다.
    pub fn from_request(req: CreateScheduleItemRequest) -> Result<Self, ValidationErrors> {
        let start_time = normalize_time("start_time", &req.start_time)?;
        let end_time = normalize_time("end_time", &req.end_time)?;
        Ok(Self {
            topic_id: req.topic_id,
            title: req.title.trim().to_string(),
            description: req.description,
            start_time,
            end_time,
            status: req.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateScheduleItemRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub topic_id: Option<Option<String>>,
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[validate(custom(function = "datetime"))]
    pub start_time: Option<String>,
    #[validate(custom(function = "datetime"))]
    pub end_time: Option<String>,
    pub status: Option<ScheduleStatus>,
}

impl ScheduleItem {
    /// 수정 요청을 병합합니다. 시각은 저장 형식으로 정규화됩니다.
    pub fn apply(&mut self, patch: UpdateScheduleItemRequest) -> Result<(), ValidationErrors> {
        if let Some(start) = patch.start_time {
            self.start_time = normalize_time("start_time", &start)?;
        }
        if let Some(end) = patch.end_time {
            self.end_time = normalize_time("end_time", &end)?;
        }
        if let Some(topic_id) = patch.topic_id {
            self.topic_id = topic_id;
        }
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.validate()
    }
}

fn normalize_time(field: &'static str, value: &str) -> Result<String, ValidationErrors> {
    parse_datetime(value).map(format_timestamp).ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(field, invalid("datetime", "must be an ISO-8601 datetime"));
        errors
    })
}

/// `GET /api/schedule?date=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleFilter {
    pub date: Option<String>,
}

impl ScheduleFilter {
    /// 날짜 필터를 `[해당일 00:00Z, 다음날 00:00Z)` 저장 형식 범위로 바꿉니다.
    ///
    /// - `Ok(None)`: 필터 없음
    /// - `Err`: 날짜 형식이 잘못됨
    pub fn day_range(&self) -> Result<Option<(String, String)>, FieldError> {
        let Some(raw) = self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(None);
        };
        let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| FieldError::new("date", "must be a date like 2026-03-01"))?;
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);
        Ok(Some((format_timestamp(start), format_timestamp(end))))
    }
}

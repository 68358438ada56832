use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_string_to_i64;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

// 课节查询参数（来自HTTP请求），from / to 为 Unix 秒
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub group_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub from: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub to: Option<i64>,
}

// 创建课节
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct CreateClassRequest {
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub group_id: i64,
    pub teacher_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

// 更新课节（部分字段）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct UpdateClassRequest {
    pub starts_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub group_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub group_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生分组（如 "ИВТ-21"）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub admission_year: i32,
}

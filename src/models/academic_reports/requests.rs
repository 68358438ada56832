use super::entities::Grade;
use serde::Deserialize;
use ts_rs::TS;

/// 单次提交的最大条数
pub const MAX_REPORTS_PER_REQUEST: usize = 500;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic_report.ts")]
pub struct AcademicReportItem {
    pub student_id: i64,
    pub class_id: i64,
    #[serde(default)]
    pub is_attended: bool,
    #[serde(default)]
    pub grade: Option<Grade>,
}

// 批量写入（已存在的 (student_id, class_id) 会被更新）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic_report.ts")]
pub struct UpsertAcademicReportsRequest {
    pub reports: Vec<AcademicReportItem>,
}

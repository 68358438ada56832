use super::entities::{AcademicReport, AcademicReportRead};
use crate::models::common::WeekPage;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic_report.ts")]
pub struct AcademicReportListResponse {
    pub items: Vec<AcademicReportRead>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "academic_report.ts")]
pub struct UpsertAcademicReportsResponse {
    pub items: Vec<AcademicReport>,
}

pub type WeeklyAcademicReportsResponse = WeekPage<Vec<AcademicReportRead>>;

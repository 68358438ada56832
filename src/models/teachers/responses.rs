use super::entities::Teacher;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherAuthResponse {
    pub token: String,
    pub teacher: Teacher,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct CompetenciesResponse {
    pub competencies: Vec<String>,
}

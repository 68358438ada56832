use serde::Deserialize;
use ts_rs::TS;

// 教师注册，competencies 中不存在的学科会被自动创建
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherRegisterRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub competencies: Vec<String>,
}

// 整体替换教师能力
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct UpdateCompetenciesRequest {
    pub competencies: Vec<String>,
}

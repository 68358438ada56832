use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师（用户身份 + 资历 + 可教授学科名）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub profile_photo_uri: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub qualification: Option<String>,
    pub education: Option<String>,
    pub is_verified: bool,
    pub competencies: Vec<String>,
}

// 教师档案字段
#[derive(Debug, Clone, Default)]
pub struct TeacherProfile {
    pub qualification: Option<String>,
    pub education: Option<String>,
}

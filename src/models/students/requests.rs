use serde::Deserialize;
use ts_rs::TS;

// 学生自助注册
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentRegisterRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub email: String,
    pub password: String,
    /// 为空表示暂不加入分组
    #[serde(default)]
    pub group_name: String,
}

// 管理员调整学生分组，null 表示移出分组
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub group_id: Option<i64>,
}

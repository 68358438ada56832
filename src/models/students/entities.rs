use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::groups::entities::Group;

// 学生（用户身份 + 所在分组）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub profile_photo_uri: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub group: Option<Group>,
    pub is_verified: bool,
}

impl Student {
    pub fn group_id(&self) -> Option<i64> {
        self.group.as_ref().map(|g| g.id)
    }
}

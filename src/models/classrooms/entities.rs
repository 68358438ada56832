use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "classroom.ts")]
pub struct Classroom {
    pub id: i64,
    pub name: String,
}

use super::entities::{ClassRead, DailySchedule};
use crate::models::common::{PaginationInfo, WeekPage};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassRead>,
    pub pagination: PaginationInfo,
}

pub type ScheduleResponse = WeekPage<Vec<DailySchedule>>;

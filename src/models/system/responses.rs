use serde::Serialize;
use ts_rs::TS;

// 根路径欢迎信息，保持历史格式 {"msg": ...}
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct WelcomeResponse {
    pub msg: String,
}

// 健康检查
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub system_name: String,
    pub version: String,
    pub environment: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// 秒
    pub uptime: i64,
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{
    ApiResponse, AppStartTime,
    system::responses::{HealthResponse, WelcomeResponse},
};

pub const WELCOME_MESSAGE: &str = "Welcome to Sirius-journal API!";

pub async fn welcome() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(WelcomeResponse {
        msg: WELCOME_MESSAGE.to_string(),
    }))
}

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let now = chrono::Utc::now();

    // 未注入启动时间时按当前时间计算
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|data| data.start_datetime)
        .unwrap_or(now);

    let response = HealthResponse {
        status: "ok".to_string(),
        system_name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        started_at,
        uptime: now.signed_duration_since(started_at).num_seconds(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academic_reports::requests::UpsertAcademicReportsRequest;
use crate::models::users::entities::UserRole;
use crate::services::AcademicReportService;
use crate::utils::SafeIDI64;

static ACADEMIC_REPORT_SERVICE: Lazy<AcademicReportService> =
    Lazy::new(AcademicReportService::new_lazy);

pub async fn upsert_reports(
    req: HttpRequest,
    reports: web::Json<UpsertAcademicReportsRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_REPORT_SERVICE
        .upsert_reports(reports.into_inner(), &req)
        .await
}

// 挂在 /api/v1/classes/{id}/academic-reports 下
pub async fn list_class_reports(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_REPORT_SERVICE
        .list_class_reports(class_id.0, &req)
        .await
}

pub fn configure_academic_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("", web::post().to(upsert_reports)),
            ),
    );
}

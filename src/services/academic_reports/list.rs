use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicReportService;
use crate::models::{
    ApiResponse, ErrorCode, academic_reports::responses::AcademicReportListResponse,
};
use crate::services::{current_user, forbidden, internal_error};

pub async fn list_class_reports(
    service: &AcademicReportService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get academic reports", e)),
    };

    // 只有授课教师和管理员可以查看
    if !user.is_admin() && class.teacher_id != Some(user.id) {
        return Ok(forbidden("You do not teach this class"));
    }

    match storage.list_class_reports(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AcademicReportListResponse { items },
            "Academic reports retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to get academic reports", e)),
    }
}

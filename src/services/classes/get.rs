use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, internal_error};

fn class_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassNotFound,
        "Class not found",
    ))
}

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(internal_error("Failed to get class information", e)),
    };

    // 学生只能查看本组的课
    if user.role == UserRole::Student {
        let group_id = match storage.get_student_by_id(user.id).await {
            Ok(student) => student.and_then(|s| s.group_id()),
            Err(e) => return Ok(internal_error("Failed to get class information", e)),
        };
        if group_id != Some(class.group_id) {
            return Ok(forbidden("You can only view classes of your own group"));
        }
    }

    match storage.get_class_read(class_id).await {
        Ok(Some(read)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            read,
            "Class information retrieved successfully",
        ))),
        Ok(None) => Ok(class_not_found()),
        Err(e) => Ok(internal_error("Failed to get class information", e)),
    }
}

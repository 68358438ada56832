use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use super::validate::{ClassDraft, check_class_draft};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

fn class_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassNotFound,
        "Class not found",
    ))
}

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let existing = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(internal_error("Class update failed", e)),
    };

    // 在合并后的结果上做校验
    let draft = ClassDraft {
        duration_minutes: update_data
            .duration_minutes
            .unwrap_or(existing.duration_minutes),
        group_id: update_data.group_id.unwrap_or(existing.group_id),
        teacher_id: update_data.teacher_id.or(existing.teacher_id),
        subject_id: update_data.subject_id.or(existing.subject_id),
        classroom_id: update_data.classroom_id.or(existing.classroom_id),
    };
    if let Err(resp) = check_class_draft(&storage, &draft).await {
        return Ok(resp);
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(internal_error("Class update failed", e)),
    }

    match storage.get_class_read(class_id).await {
        Ok(Some(read)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            read,
            "Class updated successfully",
        ))),
        Ok(None) => Ok(class_not_found()),
        Err(e) => Ok(internal_error("Class update failed", e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::services::internal_error;

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    update: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(group_id) = update.group_id {
        match storage.get_group_by_id(group_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::GroupNotFound,
                    "Group not found",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to update student", e)),
        }
    }

    match storage
        .update_student_group(student_id, update.group_id)
        .await
    {
        Ok(Some(student)) => {
            info!(
                "Student {} moved to group {:?}",
                student.id,
                student.group_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update student", e)),
    }
}

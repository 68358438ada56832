use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassroomService;
use crate::errors::JournalError;
use crate::models::{ApiResponse, ErrorCode, classrooms::requests::ClassroomRequest};
use crate::services::internal_error;
use crate::utils::validate::validate_resource_name;

fn classroom_exists() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ClassroomAlreadyExists,
        "Classroom with such name already exists",
    ))
}

fn classroom_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassroomNotFound,
        "Classroom not found",
    ))
}

pub async fn create_classroom(
    service: &ClassroomService,
    classroom: ClassroomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = classroom.name.trim().to_string();
    if let Err(msg) = validate_resource_name(&name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.create_classroom(name).await {
        Ok(classroom) => {
            info!("Classroom {} created", classroom.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                classroom,
                "Classroom created successfully",
            )))
        }
        Err(JournalError::AlreadyExists(_)) => Ok(classroom_exists()),
        Err(e) => Ok(internal_error("Classroom creation failed", e)),
    }
}

pub async fn update_classroom(
    service: &ClassroomService,
    classroom_id: i64,
    classroom: ClassroomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = classroom.name.trim().to_string();
    if let Err(msg) = validate_resource_name(&name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.update_classroom(classroom_id, name).await {
        Ok(Some(classroom)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            classroom,
            "Classroom updated successfully",
        ))),
        Ok(None) => Ok(classroom_not_found()),
        Err(JournalError::AlreadyExists(_)) => Ok(classroom_exists()),
        Err(e) => Ok(internal_error("Classroom update failed", e)),
    }
}

pub async fn delete_classroom(
    service: &ClassroomService,
    classroom_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_classroom(classroom_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Classroom deleted successfully",
        ))),
        Ok(false) => Ok(classroom_not_found()),
        Err(e) => Ok(internal_error("Classroom deletion failed", e)),
    }
}

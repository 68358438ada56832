use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::errors::JournalError;
use crate::models::{ApiResponse, ErrorCode, subjects::requests::SubjectRequest};
use crate::services::internal_error;
use crate::utils::validate::validate_resource_name;

fn subject_exists() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubjectAlreadyExists,
        "Subject with such name already exists",
    ))
}

fn subject_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubjectNotFound,
        "Subject not found",
    ))
}

fn checked_name(subject: SubjectRequest) -> Result<String, HttpResponse> {
    let name = subject.name.trim().to_string();
    validate_resource_name(&name).map_err(|msg| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))
    })?;
    Ok(name)
}

pub async fn create_subject(
    service: &SubjectService,
    subject: SubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = match checked_name(subject) {
        Ok(name) => name,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    match storage.create_subject(name).await {
        Ok(subject) => {
            info!("Subject {} created", subject.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(subject, "Subject created successfully")))
        }
        Err(JournalError::AlreadyExists(_)) => Ok(subject_exists()),
        Err(e) => Ok(internal_error("Subject creation failed", e)),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    subject_id: i64,
    subject: SubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = match checked_name(subject) {
        Ok(name) => name,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    match storage.update_subject(subject_id, name).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(subject_not_found()),
        Err(JournalError::AlreadyExists(_)) => Ok(subject_exists()),
        Err(e) => Ok(internal_error("Subject update failed", e)),
    }
}

pub async fn delete_subject(
    service: &SubjectService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_subject(subject_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject deleted successfully",
        ))),
        Ok(false) => Ok(subject_not_found()),
        Err(e) => Ok(internal_error("Subject deletion failed", e)),
    }
}

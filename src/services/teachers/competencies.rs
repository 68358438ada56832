use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, resolve_teacher_access};
use crate::models::{
    ApiResponse, ErrorCode,
    teachers::{requests::UpdateCompetenciesRequest, responses::CompetenciesResponse},
};
use crate::services::{current_user, internal_error};
use crate::utils::PersonRef;
use crate::utils::validate::validate_resource_name;

fn teacher_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::TeacherNotFound,
        "Teacher not found",
    ))
}

pub async fn list_competencies(
    service: &TeacherService,
    person: PersonRef,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let teacher_id = match resolve_teacher_access(&user, person) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CompetenciesResponse {
                competencies: teacher.competencies,
            },
            "Competencies retrieved successfully",
        ))),
        Ok(None) => Ok(teacher_not_found()),
        Err(e) => Ok(internal_error("Failed to get competencies", e)),
    }
}

pub async fn replace_competencies(
    service: &TeacherService,
    teacher_id: i64,
    update: UpdateCompetenciesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    for subject in &update.competencies {
        if let Err(msg) = validate_resource_name(subject) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                format!("Invalid competence '{subject}': {msg}"),
            )));
        }
    }

    let storage = service.get_storage(request);

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(teacher_not_found()),
        Err(e) => return Ok(internal_error("Failed to update competencies", e)),
    }

    match storage
        .replace_teacher_competencies(teacher_id, update.competencies)
        .await
    {
        Ok(competencies) => {
            info!(
                "Teacher {} competencies replaced: {:?}",
                teacher_id, competencies
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CompetenciesResponse { competencies },
                "Competencies updated successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to update competencies", e)),
    }
}

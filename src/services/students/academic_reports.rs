use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, resolve_student_access};
use crate::models::{ApiResponse, ErrorCode, WeekPage};
use crate::services::{current_user, internal_error, week_window_or_bad_request};
use crate::utils::PersonRef;

pub async fn get_student_reports(
    service: &StudentService,
    person: PersonRef,
    offset: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let student_id = match resolve_student_access(&user, person) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };
    let (from, to) = match week_window_or_bad_request(offset) {
        Ok(window) => window,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get academic reports", e)),
    }

    match storage
        .list_student_reports_between(student_id, from, to)
        .await
    {
        Ok(reports) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            WeekPage::new(request.path(), offset, reports),
            "Academic reports retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to get academic reports", e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, resolve_teacher_access};
use crate::models::{ApiResponse, ErrorCode, WeekPage, classes::entities::DailySchedule};
use crate::services::{current_user, internal_error, week_window_or_bad_request};
use crate::utils::PersonRef;

pub async fn get_teacher_schedule(
    service: &TeacherService,
    person: PersonRef,
    offset: i64,
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
    let (from, to) = match week_window_or_bad_request(offset) {
        Ok(window) => window,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get schedule", e)),
    }

    match storage
        .list_teacher_classes_between(teacher_id, from, to)
        .await
    {
        Ok(classes) => {
            let page = WeekPage::new(
                request.path(),
                offset,
                DailySchedule::group_by_weekday(classes),
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                page,
                "Schedule retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to get schedule", e)),
    }
}

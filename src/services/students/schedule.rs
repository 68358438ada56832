use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, resolve_student_access};
use crate::models::{
    ApiResponse, ErrorCode, WeekPage,
    classes::entities::DailySchedule,
};
use crate::services::{current_user, internal_error, week_window_or_bad_request};
use crate::utils::PersonRef;

pub async fn get_student_schedule(
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

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get schedule", e)),
    };

    // 未分组的学生课表为空
    let classes = match student.group_id() {
        Some(group_id) => match storage.list_group_classes_between(group_id, from, to).await {
            Ok(classes) => classes,
            Err(e) => return Ok(internal_error("Failed to get schedule", e)),
        },
        None => Vec::new(),
    };

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

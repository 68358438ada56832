use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::classes::requests::{ClassListParams, ClassListQuery};
use crate::models::users::entities::UserRole;
use crate::models::ApiResponse;
use crate::services::{current_user, internal_error};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 教师只能查询自己的课节
    let teacher_id = match user.role {
        UserRole::Teacher => Some(user.id),
        _ => query.teacher_id,
    };

    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        group_id: query.group_id,
        teacher_id,
        from: query.from,
        to: query.to,
    };

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve class list", e)),
    }
}

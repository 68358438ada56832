use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::internal_error;

pub async fn list_group_students(
    service: &GroupService,
    group_id: i64,
    query: PaginationQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_group_by_id(group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GroupNotFound,
                "Group not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to list group students", e)),
    }

    match storage
        .list_students_by_group(group_id, Some(query.page), Some(query.size))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Group students retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to list group students", e)),
    }
}

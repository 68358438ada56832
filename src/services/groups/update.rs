use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::errors::JournalError;
use crate::models::{ApiResponse, ErrorCode, groups::requests::UpdateGroupRequest};
use crate::services::internal_error;
use crate::utils::validate::validate_resource_name;

pub async fn update_group(
    service: &GroupService,
    group_id: i64,
    mut update_data: UpdateGroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref mut name) = update_data.name {
        *name = name.trim().to_string();
        if let Err(msg) = validate_resource_name(name) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    }

    let storage = service.get_storage(request);

    match storage.update_group(group_id, update_data).await {
        Ok(Some(group)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group,
            "Group updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GroupNotFound,
            "Group not found",
        ))),
        Err(JournalError::AlreadyExists(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::GroupAlreadyExists,
                "Group with such name already exists",
            ),
        )),
        Err(e) => Ok(internal_error("Group update failed", e)),
    }
}

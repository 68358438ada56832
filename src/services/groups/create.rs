use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GroupService;
use crate::errors::JournalError;
use crate::models::{ApiResponse, ErrorCode, groups::requests::CreateGroupRequest};
use crate::services::internal_error;
use crate::utils::validate::validate_resource_name;

pub async fn create_group(
    service: &GroupService,
    mut group_data: CreateGroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    group_data.name = group_data.name.trim().to_string();
    if let Err(msg) = validate_resource_name(&group_data.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.create_group(group_data).await {
        Ok(group) => {
            info!("Group {} created", group.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(group, "Group created successfully")))
        }
        Err(JournalError::AlreadyExists(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::GroupAlreadyExists,
                "Group with such name already exists",
            ),
        )),
        Err(e) => Ok(internal_error("Group creation failed", e)),
    }
}

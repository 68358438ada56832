use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::JournalError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::internal_error;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_email, validate_email, validate_password_simple, validate_person_name,
};

/// 管理员不能通过管理接口降级或停用自己
fn demotes_self(update: &UpdateUserRequest) -> bool {
    update.role.is_some_and(|role| role != UserRole::Admin) || update.is_active == Some(false)
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if RequireJWT::extract_user_id(request) == Some(user_id) && demotes_self(&update_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDemoteCurrentUser,
            "Cannot change role or deactivate current user",
        )));
    }

    for name in [&mut update_data.name, &mut update_data.surname]
        .into_iter()
        .flatten()
    {
        *name = name.trim().to_string();
        if let Err(msg) = validate_person_name(name) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
        }
    }

    if let Some(ref mut email) = update_data.email {
        *email = normalize_email(email);
        if let Err(msg) = validate_email(email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserPasswordInvalid,
                msg,
            )));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(internal_error("Password hashing failed", e)),
        }
    }

    let storage = service.get_storage(request);

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User information updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(JournalError::AlreadyExists(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "User with such email already exists",
            ),
        )),
        Err(e) => Ok(internal_error("Failed to update user information", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demotes_self() {
        assert!(!demotes_self(&UpdateUserRequest::default()));
        assert!(!demotes_self(&UpdateUserRequest {
            role: Some(UserRole::Admin),
            is_active: Some(true),
            ..Default::default()
        }));
        assert!(demotes_self(&UpdateUserRequest {
            role: Some(UserRole::Teacher),
            ..Default::default()
        }));
        assert!(demotes_self(&UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        }));
    }
}

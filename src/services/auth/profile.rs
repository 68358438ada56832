use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::JournalError;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    normalize_email, validate_email, validate_password_simple, validate_person_name,
};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    for name in [&update_data.name, &update_data.surname].into_iter().flatten() {
        if let Err(msg) = validate_person_name(name) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
        }
    }

    // 验证邮箱格式与唯一性
    let email = update_data.email.as_deref().map(normalize_email);
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != current_user.id => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "User with such email already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to update profile", e)),
        }
    }

    // 处理密码（如果提供了新密码）
    let hashed_password = match update_data.password {
        Some(ref password) => {
            if let Err(msg) = validate_password_simple(password) {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserPasswordInvalid,
                    msg,
                )));
            }
            match hash_password(password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(internal_error("Password hashing failed", e)),
            }
        }
        None => None,
    };

    // 角色与状态不允许自行修改
    let storage_update = UpdateUserRequest {
        name: update_data.name.map(|s| s.trim().to_string()),
        surname: update_data.surname.map(|s| s.trim().to_string()),
        email,
        password: hashed_password,
        date_of_birth: update_data.date_of_birth,
        profile_photo_uri: update_data.profile_photo_uri,
        ..Default::default()
    };

    match storage.update_user(current_user.id, storage_update).await {
        Ok(Some(user)) => {
            // 当前 token 对应的缓存已过时
            if let (Some(cache), Some(token)) = (
                service.get_cache(request),
                JwtUtils::extract_bearer_token(request),
            ) {
                cache.remove(&user_cache_key(&token)).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(JournalError::AlreadyExists(_)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "User with such email already exists",
            ),
        )),
        Err(e) => Ok(internal_error("Failed to update profile", e)),
    }
}

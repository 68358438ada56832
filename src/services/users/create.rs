use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::JournalError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{internal_error, validate_identity_fields};
use crate::utils::password::hash_password;
use crate::utils::validate::normalize_email;

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.email = normalize_email(&user_data.email);
    user_data.name = user_data.name.trim().to_string();
    user_data.surname = user_data.surname.trim().to_string();

    if let Err(resp) = validate_identity_fields(
        &user_data.name,
        &user_data.surname,
        &user_data.email,
        &user_data.password,
    ) {
        return Ok(resp);
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    let storage = service.get_storage(request);

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.id, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "User created successfully",
            )))
        }
        Err(JournalError::AlreadyExists(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "User with such email already exists",
            ),
        )),
        Err(e) => Ok(internal_error("User creation failed", e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::JournalError;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::StudentRegisterRequest, responses::StudentAuthResponse},
    users::entities::UserRole,
};
use crate::services::{internal_error, validate_identity_fields};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::validate::normalize_email;

fn email_taken() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::UserEmailAlreadyExists,
        "User with such email already exists",
    ))
}

pub async fn register_student(
    service: &StudentService,
    mut register_request: StudentRegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    register_request.email = normalize_email(&register_request.email);
    register_request.name = register_request.name.trim().to_string();
    register_request.surname = register_request.surname.trim().to_string();

    if let Err(resp) = validate_identity_fields(
        &register_request.name,
        &register_request.surname,
        &register_request.email,
        &register_request.password,
    ) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);

    match storage.get_user_by_email(&register_request.email).await {
        Ok(Some(_)) => return Ok(email_taken()),
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Student registration failed", e)),
    }

    // 空分组名表示暂不加入分组
    let group_name = register_request.group_name.trim().to_string();
    let group_id = if group_name.is_empty() {
        None
    } else {
        match storage.get_group_by_name(&group_name).await {
            Ok(Some(group)) => Some(group.id),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::GroupNotFound,
                    "Group with such name was not found",
                )));
            }
            Err(e) => return Ok(internal_error("Student registration failed", e)),
        }
    };

    register_request.password = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    let student = match storage.create_student(register_request, group_id).await {
        Ok(student) => student,
        Err(JournalError::AlreadyExists(_)) => return Ok(email_taken()),
        Err(e) => return Ok(internal_error("Student registration failed", e)),
    };

    let token = match JwtUtils::generate_access_token(student.id, UserRole::STUDENT) {
        Ok(token) => token,
        Err(e) => return Ok(internal_error("Failed to generate token", e)),
    };

    info!("Student {} registered", student.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        StudentAuthResponse { token, student },
        "Student registered successfully",
    )))
}

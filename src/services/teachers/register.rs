use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::errors::JournalError;
use crate::models::{
    ApiResponse, ErrorCode,
    teachers::{
        entities::TeacherProfile, requests::TeacherRegisterRequest,
        responses::TeacherAuthResponse,
    },
    users::entities::UserRole,
};
use crate::services::{internal_error, validate_identity_fields};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_email, validate_resource_name};

fn email_taken() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::UserEmailAlreadyExists,
        "User with such email already exists",
    ))
}

/// 关闭自助注册时，只有携带有效管理员 token 的请求可以创建教师
async fn ensure_admin_caller(
    service: &TeacherService,
    request: &HttpRequest,
) -> Result<(), HttpResponse> {
    let denied = || {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::RegistrationDisabled,
            "Teacher registration is available to admins only",
        ))
    };

    let token = JwtUtils::extract_bearer_token(request).ok_or_else(denied)?;
    let claims = JwtUtils::verify_access_token(&token).map_err(|_| denied())?;
    let user_id = claims.user_id().map_err(|_| denied())?;

    let storage = service.get_storage(request);
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_admin() && user.is_active => Ok(()),
        Ok(_) => Err(denied()),
        Err(e) => Err(internal_error("Teacher registration failed", e)),
    }
}

pub async fn register_teacher(
    service: &TeacherService,
    mut register_request: TeacherRegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !service.get_config().journal.allow_teacher_registration
        && let Err(resp) = ensure_admin_caller(service, request).await
    {
        return Ok(resp);
    }

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

    for subject in &register_request.competencies {
        if let Err(msg) = validate_resource_name(subject) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                format!("Invalid competence '{subject}': {msg}"),
            )));
        }
    }

    let storage = service.get_storage(request);

    match storage.get_user_by_email(&register_request.email).await {
        Ok(Some(_)) => return Ok(email_taken()),
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Teacher registration failed", e)),
    }

    register_request.password = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    let profile = TeacherProfile {
        qualification: register_request.qualification.clone(),
        education: register_request.education.clone(),
    };

    let teacher = match storage.create_teacher(register_request, profile).await {
        Ok(teacher) => teacher,
        Err(JournalError::AlreadyExists(_)) => return Ok(email_taken()),
        Err(e) => return Ok(internal_error("Teacher registration failed", e)),
    };

    let token = match JwtUtils::generate_access_token(teacher.id, UserRole::TEACHER) {
        Ok(token) => token,
        Err(e) => return Ok(internal_error("Failed to generate token", e)),
    };

    info!(
        "Teacher {} registered with {} competencies",
        teacher.id,
        teacher.competencies.len()
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        TeacherAuthResponse { token, teacher },
        "Teacher registered successfully",
    )))
}

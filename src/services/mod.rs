pub mod academic_reports;
pub mod auth;
pub mod classes;
pub mod classrooms;
pub mod groups;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod users;

pub use academic_reports::AcademicReportService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use classrooms::ClassroomService;
pub use groups::GroupService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::utils::current_week_window;
use crate::utils::validate::{validate_email, validate_password_simple, validate_person_name};

/// 取出 RequireJWT 放入的当前用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 记录错误日志并返回 500
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        context,
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::PermissionDenied,
        message,
    ))
}

/// 注册与管理员建号共用的身份字段校验，email 需已规范化
pub(crate) fn validate_identity_fields(
    name: &str,
    surname: &str,
    email: &str,
    password: &str,
) -> Result<(), HttpResponse> {
    for value in [name, surname] {
        if let Err(msg) = validate_person_name(value) {
            return Err(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
        }
    }
    if let Err(msg) = validate_email(email) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password_simple(password) {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            msg,
        )));
    }
    Ok(())
}

/// 周偏移对应的时间窗口，超出范围时返回 400
pub(crate) fn week_window_or_bad_request(
    offset: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), HttpResponse> {
    current_week_window(offset).ok_or_else(|| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Week offset is out of range",
        ))
    })
}

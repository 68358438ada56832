//! 数据模型定义
//!
//! - `entities`: 业务实体
//! - `requests`: HTTP 请求体 / 查询参数
//! - `responses`: HTTP 响应体

pub mod academic_reports;
pub mod auth;
pub mod classes;
pub mod classrooms;
pub mod common;
pub mod groups;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod users;

pub use common::{
    ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery, WeekOffsetQuery, WeekPage,
};

/// 程序启动时间，用于健康检查中计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，写入 `ApiResponse.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    InternalServerError = 1003,
    RateLimitExceeded = 1004,
    ValidationFailed = 1005,
    PermissionDenied = 1006,

    // 认证 2xxx
    AuthFailed = 2000,
    UserInactive = 2001,
    InvalidConfirmationToken = 2002,
    InvalidIdentity = 2003,
    AlreadyVerified = 2004,
    InvalidResetToken = 2005,
    RegistrationDisabled = 2006,

    // 用户 3xxx
    UserNotFound = 3000,
    UserEmailAlreadyExists = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserNameInvalid = 3005,
    CanNotDeleteCurrentUser = 3009,
    CanNotDemoteCurrentUser = 3010,

    // 学生 / 教师 4xxx
    StudentNotFound = 4000,
    TeacherNotFound = 4100,

    // 分组、学科、教室 5xxx
    GroupNotFound = 5000,
    GroupAlreadyExists = 5001,
    SubjectNotFound = 5100,
    SubjectAlreadyExists = 5101,
    ClassroomNotFound = 5200,
    ClassroomAlreadyExists = 5201,

    // 课节 6xxx
    ClassNotFound = 6000,
    ClassInvalidDuration = 6001,
    TeacherNoCompetence = 6002,

    // 学业记录 7xxx
    AcademicReportInvalid = 7000,
    StudentNotInClassGroup = 7001,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::UserEmailAlreadyExists as i32, 3002);
        assert_eq!(ErrorCode::TeacherNoCompetence as i32, 6002);
    }
}

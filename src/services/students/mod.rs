pub mod academic_reports;
pub mod get;
pub mod register;
pub mod schedule;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{StudentRegisterRequest, UpdateStudentRequest};
use crate::models::users::entities::{User, UserRole};
use crate::services::forbidden;
use crate::storage::Storage;
use crate::utils::PersonRef;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

/// 学生只能访问自己的数据，教师与管理员不受限
pub(crate) fn resolve_student_access(user: &User, person: PersonRef) -> Result<i64, HttpResponse> {
    let student_id = person.resolve(user.id);
    if user.role == UserRole::Student && student_id != user.id {
        return Err(forbidden("Only admins and teachers can perform this action"));
    }
    Ok(student_id)
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 学生自助注册
    pub async fn register(
        &self,
        register_request: StudentRegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::register_student(self, register_request, request).await
    }

    // 获取学生信息
    pub async fn get_student(
        &self,
        person: PersonRef,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, person, request).await
    }

    // 学生所在分组的周课表
    pub async fn get_schedule(
        &self,
        person: PersonRef,
        offset: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::get_student_schedule(self, person, offset, request).await
    }

    // 学生的周学业记录
    pub async fn get_academic_reports(
        &self,
        person: PersonRef,
        offset: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        academic_reports::get_student_reports(self, person, offset, request).await
    }

    // 调整学生分组
    pub async fn update_student(
        &self,
        student_id: i64,
        update: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, update, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            name: "Anna".into(),
            surname: "Smirnova".into(),
            email: "anna@sirius.edu".into(),
            password_hash: String::new(),
            role,
            date_of_birth: None,
            profile_photo_uri: None,
            is_active: true,
            is_verified: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_student_reads_only_self() {
        let student = user(7, UserRole::Student);
        assert_eq!(resolve_student_access(&student, PersonRef::Me).unwrap(), 7);
        assert_eq!(resolve_student_access(&student, PersonRef::Id(7)).unwrap(), 7);
        assert!(resolve_student_access(&student, PersonRef::Id(8)).is_err());
    }

    #[test]
    fn test_teacher_and_admin_read_anyone() {
        for role in [UserRole::Teacher, UserRole::Admin] {
            let u = user(1, role);
            assert_eq!(resolve_student_access(&u, PersonRef::Id(42)).unwrap(), 42);
        }
    }
}

pub mod competencies;
pub mod get;
pub mod register;
pub mod schedule;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::teachers::requests::{TeacherRegisterRequest, UpdateCompetenciesRequest};
use crate::models::users::entities::User;
use crate::services::forbidden;
use crate::storage::Storage;
use crate::utils::PersonRef;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

/// 只有管理员或教师本人可以访问
pub(crate) fn resolve_teacher_access(user: &User, person: PersonRef) -> Result<i64, HttpResponse> {
    let teacher_id = person.resolve(user.id);
    if !user.is_admin() && teacher_id != user.id {
        return Err(forbidden("Only admins can perform this action"));
    }
    Ok(teacher_id)
}

impl TeacherService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 教师注册
    pub async fn register(
        &self,
        register_request: TeacherRegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::register_teacher(self, register_request, request).await
    }

    // 获取教师信息
    pub async fn get_teacher(
        &self,
        person: PersonRef,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_teacher(self, person, request).await
    }

    // 教师的周课表
    pub async fn get_schedule(
        &self,
        person: PersonRef,
        offset: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::get_teacher_schedule(self, person, offset, request).await
    }

    // 教师可教授的学科
    pub async fn list_competencies(
        &self,
        person: PersonRef,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        competencies::list_competencies(self, person, request).await
    }

    // 整体替换教师能力
    pub async fn replace_competencies(
        &self,
        teacher_id: i64,
        update: UpdateCompetenciesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        competencies::replace_competencies(self, teacher_id, update, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            name: "Ivan".into(),
            surname: "Ivanov".into(),
            email: "ivanov@sirius.edu".into(),
            password_hash: String::new(),
            role,
            date_of_birth: None,
            profile_photo_uri: None,
            is_active: true,
            is_verified: false,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_teacher_access_rules() {
        let teacher = user(3, UserRole::Teacher);
        assert_eq!(resolve_teacher_access(&teacher, PersonRef::Me).unwrap(), 3);
        assert!(resolve_teacher_access(&teacher, PersonRef::Id(4)).is_err());

        let student = user(5, UserRole::Student);
        assert!(resolve_teacher_access(&student, PersonRef::Id(3)).is_err());

        let admin = user(1, UserRole::Admin);
        assert_eq!(resolve_teacher_access(&admin, PersonRef::Id(3)).unwrap(), 3);
    }
}

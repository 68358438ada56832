use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    academic_reports::{
        entities::{AcademicReport, AcademicReportRead},
        requests::AcademicReportItem,
    },
    classes::{
        entities::{Class, ClassRead},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    classrooms::{
        entities::Classroom, requests::ClassroomListQuery, responses::ClassroomListResponse,
    },
    groups::{
        entities::Group,
        requests::{CreateGroupRequest, GroupListQuery, UpdateGroupRequest},
        responses::GroupListResponse,
    },
    students::{entities::Student, requests::StudentRegisterRequest, responses::StudentListResponse},
    subjects::{entities::Subject, requests::SubjectListQuery, responses::SubjectListResponse},
    teachers::{
        entities::{Teacher, TeacherProfile},
        requests::TeacherRegisterRequest,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 创建存储后端，连接数据库并执行迁移
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

/// 存储层接口；传入的密码字段均已是哈希值
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（同时创建对应角色的档案行）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 学生
    async fn create_student(
        &self,
        req: StudentRegisterRequest,
        group_id: Option<i64>,
    ) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn update_student_group(&self, id: i64, group_id: Option<i64>)
    -> Result<Option<Student>>;
    async fn list_students_by_group(
        &self,
        group_id: i64,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<StudentListResponse>;
    // 学生 ID -> 所在分组，不存在的学生不会出现在结果里
    async fn get_student_groups(&self, student_ids: &[i64]) -> Result<HashMap<i64, Option<i64>>>;

    /// 教师
    async fn create_teacher(
        &self,
        req: TeacherRegisterRequest,
        profile: TeacherProfile,
    ) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    // 整体替换，不存在的学科会被创建
    async fn replace_teacher_competencies(
        &self,
        teacher_id: i64,
        subjects: Vec<String>,
    ) -> Result<Vec<String>>;
    async fn has_competence(&self, teacher_id: i64, subject_id: i64) -> Result<bool>;

    /// 分组
    async fn create_group(&self, req: CreateGroupRequest) -> Result<Group>;
    async fn get_group_by_id(&self, id: i64) -> Result<Option<Group>>;
    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>>;
    async fn list_groups_with_pagination(&self, query: GroupListQuery)
    -> Result<GroupListResponse>;
    async fn update_group(&self, id: i64, update: UpdateGroupRequest) -> Result<Option<Group>>;
    async fn delete_group(&self, id: i64) -> Result<bool>;

    /// 学科
    async fn create_subject(&self, name: String) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(&self, id: i64, name: String) -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 教室
    async fn create_classroom(&self, name: String) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    async fn update_classroom(&self, id: i64, name: String) -> Result<Option<Classroom>>;
    async fn delete_classroom(&self, id: i64) -> Result<bool>;

    /// 课节；duration_minutes 由服务层填好
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>>;
    async fn get_classes_by_ids(&self, ids: &[i64]) -> Result<Vec<Class>>;
    async fn get_class_read(&self, id: i64) -> Result<Option<ClassRead>>;
    async fn list_classes_with_pagination(&self, query: ClassListQuery)
    -> Result<ClassListResponse>;
    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>>;
    async fn delete_class(&self, id: i64) -> Result<bool>;
    // [from, to) 窗口内的课节
    async fn list_group_classes_between(
        &self,
        group_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassRead>>;
    async fn list_teacher_classes_between(
        &self,
        teacher_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassRead>>;

    /// 学业记录
    // 按 (student_id, class_id) 插入或更新，单个事务
    async fn upsert_academic_reports(
        &self,
        reports: Vec<AcademicReportItem>,
    ) -> Result<Vec<AcademicReport>>;
    async fn list_student_reports_between(
        &self,
        student_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AcademicReportRead>>;
    async fn list_class_reports(&self, class_id: i64) -> Result<Vec<AcademicReportRead>>;
}

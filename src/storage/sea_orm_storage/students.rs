//! 学生存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::students::{self, Column, Entity as Students};
use crate::entity::{groups, user_identities};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    groups::entities::Group,
    students::{entities::Student, requests::StudentRegisterRequest, responses::StudentListResponse},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

fn build_student(identity: user_identities::Model, group: Option<Group>) -> Student {
    Student {
        id: identity.id,
        name: identity.name,
        surname: identity.surname,
        email: identity.email,
        profile_photo_uri: identity.profile_photo_uri,
        birth_date: identity.date_of_birth,
        group,
        is_verified: identity.is_verified,
    }
}

impl SeaOrmStorage {
    /// 注册学生：身份行与学生行在同一事务中创建
    pub async fn create_student_impl(
        &self,
        req: StudentRegisterRequest,
        group_id: Option<i64>,
    ) -> Result<Student> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_read_err("开启事务失败", e))?;

        let identity = Self::insert_identity(
            &txn,
            CreateUserRequest {
                name: req.name,
                surname: req.surname,
                email: req.email,
                password: req.password,
                role: UserRole::Student,
                date_of_birth: req.date_of_birth,
                profile_photo_uri: None,
            },
        )
        .await?;

        students::ActiveModel {
            id: Set(identity.id),
            group_id: Set(group_id),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_err("创建学生失败", e))?;

        let group = match group_id {
            Some(gid) => groups::Entity::find_by_id(gid)
                .one(&txn)
                .await
                .map_err(|e| map_read_err("查询分组失败", e))?
                .map(|g| g.into_group()),
            None => None,
        };

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        Ok(build_student(identity, group))
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let found = Students::find_by_id(id)
            .find_also_related(user_identities::Entity)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询学生失败", e))?;

        let Some((student, Some(identity))) = found else {
            return Ok(None);
        };

        let group = match student.group_id {
            Some(gid) => self.get_group_by_id_impl(gid).await?,
            None => None,
        };

        Ok(Some(build_student(identity, group)))
    }

    /// 调整学生分组，None 表示移出分组
    pub async fn update_student_group_impl(
        &self,
        id: i64,
        group_id: Option<i64>,
    ) -> Result<Option<Student>> {
        let result = Students::update_many()
            .col_expr(Column::GroupId, sea_orm::sea_query::Expr::value(group_id))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("更新学生分组失败", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_student_by_id_impl(id).await
    }

    /// 分组内的学生，按 ID 排序
    pub async fn list_students_by_group_impl(
        &self,
        group_id: i64,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<StudentListResponse> {
        let (page, size) = PaginationQuery::normalized(page, size);
        let group = self.get_group_by_id_impl(group_id).await?;

        let paginator = Students::find()
            .filter(Column::GroupId.eq(group_id))
            .order_by_asc(Column::Id)
            .find_also_related(user_identities::Entity)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询学生总数失败", e))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询学生列表失败", e))?;

        Ok(StudentListResponse {
            items: rows
                .into_iter()
                .filter_map(|(_, identity)| identity)
                .map(|identity| build_student(identity, group.clone()))
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 学生 ID -> 分组 ID
    pub async fn get_student_groups_impl(
        &self,
        student_ids: &[i64],
    ) -> Result<HashMap<i64, Option<i64>>> {
        if student_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = Students::find()
            .filter(Column::Id.is_in(student_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询学生失败", e))?;

        Ok(rows.into_iter().map(|s| (s.id, s.group_id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JournalError;
    use crate::models::groups::requests::CreateGroupRequest;

    fn register_request(email: &str) -> StudentRegisterRequest {
        StudentRegisterRequest {
            name: "Ivan".into(),
            surname: "Ivanov".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2005, 4, 12),
            email: email.into(),
            password: "hashed".into(),
            group_name: String::new(),
        }
    }

    #[tokio::test]
    async fn test_register_student_with_group() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let group = storage
            .create_group_impl(CreateGroupRequest {
                name: "ИТ-21".into(),
                admission_year: 2021,
            })
            .await
            .unwrap();

        let student = storage
            .create_student_impl(register_request("ivan@sirius.edu"), Some(group.id))
            .await
            .unwrap();
        assert_eq!(student.group_id(), Some(group.id));
        assert!(!student.is_verified);

        let user = storage.get_user_by_id_impl(student.id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Student);

        let fetched = storage
            .get_student_by_id_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.group.map(|g| g.name), Some("ИТ-21".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_registration_rolls_back() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_student_impl(register_request("same@sirius.edu"), None)
            .await
            .unwrap();
        let err = storage
            .create_student_impl(register_request("same@sirius.edu"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::AlreadyExists(_)));
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_group_membership() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let group = storage
            .create_group_impl(CreateGroupRequest {
                name: "М-22".into(),
                admission_year: 2022,
            })
            .await
            .unwrap();
        let a = storage
            .create_student_impl(register_request("a@sirius.edu"), Some(group.id))
            .await
            .unwrap();
        let b = storage
            .create_student_impl(register_request("b@sirius.edu"), None)
            .await
            .unwrap();

        let list = storage
            .list_students_by_group_impl(group.id, None, None)
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, a.id);

        let moved = storage
            .update_student_group_impl(b.id, Some(group.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.group_id(), Some(group.id));

        let groups = storage
            .get_student_groups_impl(&[a.id, b.id, 999])
            .await
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&b.id], Some(group.id));

        // 删除分组后学生保留，分组置空
        assert!(storage.delete_group_impl(group.id).await.unwrap());
        let orphan = storage.get_student_by_id_impl(a.id).await.unwrap().unwrap();
        assert!(orphan.group.is_none());
    }

    #[tokio::test]
    async fn test_role_change_drops_student_profile() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let group = storage
            .create_group_impl(CreateGroupRequest {
                name: "Ф-23".into(),
                admission_year: 2023,
            })
            .await
            .unwrap();
        let student = storage
            .create_student_impl(register_request("former@sirius.edu"), Some(group.id))
            .await
            .unwrap();

        storage
            .update_user_impl(
                student.id,
                crate::models::users::requests::UpdateUserRequest {
                    role: Some(UserRole::Teacher),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let listed = storage
            .list_students_by_group_impl(group.id, None, None)
            .await
            .unwrap();
        assert!(listed.items.is_empty());
        assert!(storage.get_student_by_id_impl(student.id).await.unwrap().is_none());
        assert!(
            storage
                .get_student_groups_impl(&[student.id])
                .await
                .unwrap()
                .is_empty()
        );
        assert!(storage.get_teacher_by_id_impl(student.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_students_with_huge_page() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let group = storage
            .create_group_impl(CreateGroupRequest {
                name: "Х-24".into(),
                admission_year: 2024,
            })
            .await
            .unwrap();
        storage
            .create_student_impl(register_request("far@sirius.edu"), Some(group.id))
            .await
            .unwrap();

        let list = storage
            .list_students_by_group_impl(group.id, Some(i64::MAX), Some(100))
            .await
            .unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.pagination.total, 1);
    }
}

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::user_identities::{self, ActiveModel, Column, Entity as UserIdentities};
use crate::entity::{students, teachers};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 插入身份行（调用方负责事务）
    pub(super) async fn insert_identity<C: ConnectionTrait>(
        conn: &C,
        req: CreateUserRequest,
    ) -> Result<user_identities::Model> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            surname: Set(req.surname),
            date_of_birth: Set(req.date_of_birth),
            profile_photo_uri: Set(req.profile_photo_uri),
            email: Set(req.email),
            hashed_password: Set(req.password),
            role: Set(req.role.to_string()),
            is_active: Set(true),
            is_verified: Set(false),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| map_write_err("创建用户失败", e))
    }

    /// 保证角色对应的档案行存在
    pub(super) async fn ensure_profile_row<C: ConnectionTrait>(
        conn: &C,
        id: i64,
        role: UserRole,
    ) -> Result<()> {
        match role {
            UserRole::Student => {
                let exists = students::Entity::find_by_id(id)
                    .one(conn)
                    .await
                    .map_err(|e| map_read_err("查询学生失败", e))?
                    .is_some();
                if !exists {
                    students::ActiveModel {
                        id: Set(id),
                        group_id: Set(None),
                    }
                    .insert(conn)
                    .await
                    .map_err(|e| map_write_err("创建学生档案失败", e))?;
                }
            }
            UserRole::Teacher => {
                let exists = teachers::Entity::find_by_id(id)
                    .one(conn)
                    .await
                    .map_err(|e| map_read_err("查询教师失败", e))?
                    .is_some();
                if !exists {
                    teachers::ActiveModel {
                        id: Set(id),
                        qualification: Set(None),
                        education: Set(None),
                    }
                    .insert(conn)
                    .await
                    .map_err(|e| map_write_err("创建教师档案失败", e))?;
                }
            }
            UserRole::Admin => {}
        }
        Ok(())
    }

    /// 删除与新角色不符的档案行，学生的学业记录随之级联删除
    pub(super) async fn remove_stale_profile_rows<C: ConnectionTrait>(
        conn: &C,
        id: i64,
        role: UserRole,
    ) -> Result<()> {
        if role != UserRole::Student {
            students::Entity::delete_by_id(id)
                .exec(conn)
                .await
                .map_err(|e| map_write_err("删除学生档案失败", e))?;
        }
        if role != UserRole::Teacher {
            teachers::Entity::delete_by_id(id)
                .exec(conn)
                .await
                .map_err(|e| map_write_err("删除教师档案失败", e))?;
        }
        Ok(())
    }

    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let role = req.role;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_read_err("开启事务失败", e))?;

        let identity = Self::insert_identity(&txn, req).await?;
        Self::ensure_profile_row(&txn, identity.id, role).await?;

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        Ok(identity.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = UserIdentities::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = UserIdentities::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = UserIdentities::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(like_contains(search)))
                    .add(Column::Surname.like(like_contains(search)))
                    .add(Column::Email.like(like_contains(search))),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询用户总数失败", e))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询用户列表失败", e))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = UserIdentities::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("更新最后登录时间失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息；角色变化时同步档案行
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_read_err("开启事务失败", e))?;

        let existing = UserIdentities::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_read_err("查询用户失败", e))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(surname) = update.surname {
            model.surname = Set(surname);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.hashed_password = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
            Self::remove_stale_profile_rows(&txn, id, role).await?;
            Self::ensure_profile_row(&txn, id, role).await?;
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(is_verified) = update.is_verified {
            model.is_verified = Set(is_verified);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(profile_photo_uri) = update.profile_photo_uri {
            model.profile_photo_uri = Set(Some(profile_photo_uri));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| map_write_err("更新用户失败", e))?;

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户（档案行级联删除）
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = UserIdentities::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除用户失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        UserIdentities::find()
            .count(&self.db)
            .await
            .map_err(|e| map_read_err("统计用户数量失败", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JournalError;

    fn admin_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Anna".into(),
            surname: "Smirnova".into(),
            email: email.into(),
            password: "hashed".into(),
            role: UserRole::Admin,
            date_of_birth: None,
            profile_photo_uri: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(admin_request("anna@sirius.edu"))
            .await
            .unwrap();

        assert!(user.is_active);
        assert!(!user.is_verified);
        let found = storage
            .get_user_by_email_impl("anna@sirius.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_exists() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(admin_request("dup@sirius.edu"))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(admin_request("dup@sirius.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_role_change_creates_profile_row() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(admin_request("role@sirius.edu"))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    role: Some(UserRole::Teacher),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Teacher);
        assert!(
            storage
                .get_teacher_by_id_impl(user.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_list_users_filters() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(admin_request("a@sirius.edu"))
            .await
            .unwrap();
        let mut student = admin_request("b@sirius.edu");
        student.role = UserRole::Student;
        student.surname = "Petrov".into();
        storage.create_user_impl(student).await.unwrap();

        let result = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Student),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.pagination.total, 1);

        let result = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("petr".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        assert!(
            storage
                .update_user_impl(99, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.delete_user_impl(99).await.unwrap());
    }
}

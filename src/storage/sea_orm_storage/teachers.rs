//! 教师与教师能力存储操作

use std::collections::BTreeSet;

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::teachers::{self, Entity as Teachers};
use crate::entity::{competencies, subjects, user_identities};
use crate::errors::Result;
use crate::models::{
    teachers::{
        entities::{Teacher, TeacherProfile},
        requests::TeacherRegisterRequest,
    },
    users::{entities::UserRole, requests::CreateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 去掉首尾空白、空串与重复项
fn normalize_subject_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl SeaOrmStorage {
    /// 按名称查找学科，不存在的自动创建
    pub(super) async fn resolve_subject_ids<C: ConnectionTrait>(
        conn: &C,
        names: &[String],
    ) -> Result<Vec<i64>> {
        let names = normalize_subject_names(names);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let existing = subjects::Entity::find()
            .filter(subjects::Column::Name.is_in(names.clone()))
            .all(conn)
            .await
            .map_err(|e| map_read_err("查询学科失败", e))?;

        let mut ids: Vec<i64> = existing.iter().map(|s| s.id).collect();
        for name in names {
            if existing.iter().any(|s| s.name == name) {
                continue;
            }
            let created = subjects::ActiveModel {
                name: Set(name),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| map_write_err("创建学科失败", e))?;
            ids.push(created.id);
        }
        Ok(ids)
    }

    /// 整体替换教师能力（调用方负责事务）
    async fn set_competencies<C: ConnectionTrait>(
        conn: &C,
        teacher_id: i64,
        names: &[String],
    ) -> Result<()> {
        let subject_ids = Self::resolve_subject_ids(conn, names).await?;

        competencies::Entity::delete_many()
            .filter(competencies::Column::TeacherId.eq(teacher_id))
            .exec(conn)
            .await
            .map_err(|e| map_write_err("清除教师能力失败", e))?;

        if subject_ids.is_empty() {
            return Ok(());
        }

        let rows = subject_ids.into_iter().map(|subject_id| competencies::ActiveModel {
            teacher_id: Set(teacher_id),
            subject_id: Set(subject_id),
        });
        competencies::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| map_write_err("写入教师能力失败", e))?;
        Ok(())
    }

    /// 注册教师
    pub async fn create_teacher_impl(
        &self,
        req: TeacherRegisterRequest,
        profile: TeacherProfile,
    ) -> Result<Teacher> {
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
                role: UserRole::Teacher,
                date_of_birth: req.date_of_birth,
                profile_photo_uri: None,
            },
        )
        .await?;

        teachers::ActiveModel {
            id: Set(identity.id),
            qualification: Set(profile.qualification),
            education: Set(profile.education),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_err("创建教师失败", e))?;

        Self::set_competencies(&txn, identity.id, &req.competencies).await?;

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        self.get_teacher_by_id_impl(identity.id)
            .await?
            .ok_or_else(|| crate::errors::JournalError::not_found("教师创建后未找到"))
    }

    /// 通过 ID 获取教师（含能力列表）
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let found = Teachers::find_by_id(id)
            .find_also_related(user_identities::Entity)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询教师失败", e))?;

        let Some((teacher, Some(identity))) = found else {
            return Ok(None);
        };

        let competencies = self.list_teacher_competencies_impl(id).await?;

        Ok(Some(Teacher {
            id: identity.id,
            name: identity.name,
            surname: identity.surname,
            email: identity.email,
            profile_photo_uri: identity.profile_photo_uri,
            birth_date: identity.date_of_birth,
            qualification: teacher.qualification,
            education: teacher.education,
            is_verified: identity.is_verified,
            competencies,
        }))
    }

    /// 教师能力（学科名，按名称排序）
    pub async fn list_teacher_competencies_impl(&self, teacher_id: i64) -> Result<Vec<String>> {
        let rows = subjects::Entity::find()
            .inner_join(competencies::Entity)
            .filter(competencies::Column::TeacherId.eq(teacher_id))
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询教师能力失败", e))?;

        Ok(rows.into_iter().map(|s| s.name).collect())
    }

    pub async fn replace_teacher_competencies_impl(
        &self,
        teacher_id: i64,
        names: Vec<String>,
    ) -> Result<Vec<String>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_read_err("开启事务失败", e))?;

        Self::set_competencies(&txn, teacher_id, &names).await?;

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        self.list_teacher_competencies_impl(teacher_id).await
    }

    pub async fn has_competence_impl(&self, teacher_id: i64, subject_id: i64) -> Result<bool> {
        let found = competencies::Entity::find_by_id((teacher_id, subject_id))
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询教师能力失败", e))?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(email: &str, competencies: &[&str]) -> TeacherRegisterRequest {
        TeacherRegisterRequest {
            name: "Maria".into(),
            surname: "Petrova".into(),
            date_of_birth: None,
            email: email.into(),
            password: "hashed".into(),
            qualification: Some("PhD".into()),
            education: Some("MSU".into()),
            competencies: competencies.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_subject_names() {
        let names = vec![
            " Math ".to_string(),
            "Math".to_string(),
            "".to_string(),
            "Physics".to_string(),
        ];
        assert_eq!(normalize_subject_names(&names), vec!["Math", "Physics"]);
    }

    #[tokio::test]
    async fn test_register_teacher_creates_subjects() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage.create_subject_impl("Math".into()).await.unwrap();

        let req = register_request("maria@sirius.edu", &["Math", "Physics"]);
        let profile = TeacherProfile {
            qualification: req.qualification.clone(),
            education: req.education.clone(),
        };
        let teacher = storage.create_teacher_impl(req, profile).await.unwrap();

        assert_eq!(teacher.competencies, vec!["Math", "Physics"]);
        assert_eq!(teacher.qualification.as_deref(), Some("PhD"));
        let user = storage.get_user_by_id_impl(teacher.id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn test_replace_competencies() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let teacher = storage
            .create_teacher_impl(
                register_request("t@sirius.edu", &["Math", "Physics"]),
                TeacherProfile::default(),
            )
            .await
            .unwrap();

        let replaced = storage
            .replace_teacher_competencies_impl(teacher.id, vec!["Chemistry".into(), "Math".into()])
            .await
            .unwrap();
        assert_eq!(replaced, vec!["Chemistry", "Math"]);

        let subjects = storage
            .list_subjects_with_pagination_impl(Default::default())
            .await
            .unwrap();
        let physics = subjects.items.iter().find(|s| s.name == "Physics").unwrap();
        let math = subjects.items.iter().find(|s| s.name == "Math").unwrap();
        assert!(!storage.has_competence_impl(teacher.id, physics.id).await.unwrap());
        assert!(storage.has_competence_impl(teacher.id, math.id).await.unwrap());

        let cleared = storage
            .replace_teacher_competencies_impl(teacher.id, Vec::new())
            .await
            .unwrap();
        assert!(cleared.is_empty());
    }
}

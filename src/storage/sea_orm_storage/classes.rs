//! 课节存储操作

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{JournalError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    classes::{
        entities::{Class, ClassRead},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建课节
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        // 时长必须由服务层填好
        let duration_minutes = req.duration_minutes.ok_or_else(|| {
            JournalError::validation("duration_minutes must be set before calling create_class")
        })?;

        let model = ActiveModel {
            starts_at: Set(req.starts_at.timestamp()),
            duration_minutes: Set(duration_minutes),
            group_id: Set(req.group_id),
            teacher_id: Set(req.teacher_id),
            subject_id: Set(req.subject_id),
            classroom_id: Set(req.classroom_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建课节失败", e))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取课节
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询课节失败", e))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn get_classes_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Class>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Classes::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询课节失败", e))?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn get_class_read_impl(&self, class_id: i64) -> Result<Option<ClassRead>> {
        let Some(model) = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询课节失败", e))?
        else {
            return Ok(None);
        };

        Ok(self.build_class_reads(vec![model]).await?.pop())
    }

    /// 分页列出课节，按开始时间排序
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Classes::find();

        if let Some(group_id) = query.group_id {
            select = select.filter(Column::GroupId.eq(group_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::StartsAt.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::StartsAt.lt(to));
        }

        let paginator = select
            .order_by_asc(Column::StartsAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询课节总数失败", e))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询课节列表失败", e))?;

        Ok(ClassListResponse {
            items: self.build_class_reads(models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新课节（可空外键不能通过此接口清空）
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let Some(existing) = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询课节失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(starts_at) = update.starts_at {
            model.starts_at = Set(starts_at.timestamp());
        }
        if let Some(duration_minutes) = update.duration_minutes {
            model.duration_minutes = Set(duration_minutes);
        }
        if let Some(group_id) = update.group_id {
            model.group_id = Set(group_id);
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(Some(subject_id));
        }
        if let Some(classroom_id) = update.classroom_id {
            model.classroom_id = Set(Some(classroom_id));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新课节失败", e))?;

        Ok(Some(updated.into_class()))
    }

    /// 删除课节（学业记录级联删除）
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除课节失败", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_group_classes_between_impl(
        &self,
        group_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassRead>> {
        let models = Classes::find()
            .filter(Column::GroupId.eq(group_id))
            .filter(Column::StartsAt.gte(from.timestamp()))
            .filter(Column::StartsAt.lt(to.timestamp()))
            .order_by_asc(Column::StartsAt)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询分组课表失败", e))?;

        self.build_class_reads(models).await
    }

    pub async fn list_teacher_classes_between_impl(
        &self,
        teacher_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassRead>> {
        let models = Classes::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::StartsAt.gte(from.timestamp()))
            .filter(Column::StartsAt.lt(to.timestamp()))
            .order_by_asc(Column::StartsAt)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询教师课表失败", e))?;

        self.build_class_reads(models).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        groups::requests::CreateGroupRequest, teachers::entities::TeacherProfile,
        teachers::requests::TeacherRegisterRequest,
    };
    use chrono::TimeZone;

    async fn seed() -> (SeaOrmStorage, i64, i64) {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let group = storage
            .create_group_impl(CreateGroupRequest {
                name: "ИТ-21".into(),
                admission_year: 2021,
            })
            .await
            .unwrap();
        let teacher = storage
            .create_teacher_impl(
                TeacherRegisterRequest {
                    name: "Ivan".into(),
                    surname: "Ivanov".into(),
                    date_of_birth: None,
                    email: "ivanov@sirius.edu".into(),
                    password: "hashed".into(),
                    qualification: None,
                    education: None,
                    competencies: vec!["Math".into()],
                },
                TeacherProfile::default(),
            )
            .await
            .unwrap();
        (storage, group.id, teacher.id)
    }

    fn lesson(group_id: i64, teacher_id: Option<i64>, starts_at: DateTime<Utc>) -> CreateClassRequest {
        CreateClassRequest {
            starts_at,
            duration_minutes: Some(90),
            group_id,
            teacher_id,
            subject_id: None,
            classroom_id: None,
        }
    }

    #[tokio::test]
    async fn test_class_read_names() {
        let (storage, group_id, teacher_id) = seed().await;
        let room = storage.create_classroom_impl("A-101".into()).await.unwrap();
        let starts_at = Utc.with_ymd_and_hms(2024, 3, 25, 9, 0, 0).unwrap();

        let mut req = lesson(group_id, Some(teacher_id), starts_at);
        req.classroom_id = Some(room.id);
        let class = storage.create_class_impl(req).await.unwrap();

        let read = storage.get_class_read_impl(class.id).await.unwrap().unwrap();
        assert_eq!(read.group, "ИТ-21");
        assert_eq!(read.teacher.as_deref(), Some("Ivanov I."));
        assert_eq!(read.classroom.as_deref(), Some("A-101"));
        assert!(read.subject.is_none());
        assert_eq!(read.ends_at, Utc.with_ymd_and_hms(2024, 3, 25, 10, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_week_window_queries() {
        let (storage, group_id, teacher_id) = seed().await;
        let monday = Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap();
        let next_monday = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        // 边界：周一 00:00 在窗口内，下周一 00:00 不在
        storage.create_class_impl(lesson(group_id, Some(teacher_id), monday)).await.unwrap();
        storage
            .create_class_impl(lesson(group_id, None, monday + chrono::Duration::days(2)))
            .await
            .unwrap();
        storage
            .create_class_impl(lesson(group_id, Some(teacher_id), next_monday))
            .await
            .unwrap();

        let group_week = storage
            .list_group_classes_between_impl(group_id, monday, next_monday)
            .await
            .unwrap();
        assert_eq!(group_week.len(), 2);
        assert!(group_week[0].starts_at < group_week[1].starts_at);

        let teacher_week = storage
            .list_teacher_classes_between_impl(teacher_id, monday, next_monday)
            .await
            .unwrap();
        assert_eq!(teacher_week.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_list_filters() {
        let (storage, group_id, teacher_id) = seed().await;
        let starts_at = Utc.with_ymd_and_hms(2024, 3, 26, 12, 0, 0).unwrap();
        let class = storage
            .create_class_impl(lesson(group_id, None, starts_at))
            .await
            .unwrap();

        let updated = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    teacher_id: Some(teacher_id),
                    duration_minutes: Some(45),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.teacher_id, Some(teacher_id));
        assert_eq!(updated.duration_minutes, 45);
        assert_eq!(updated.starts_at, starts_at);

        let list = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                teacher_id: Some(teacher_id),
                from: Some(starts_at.timestamp()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);

        assert!(storage.delete_class_impl(class.id).await.unwrap());
        assert!(storage.get_class_by_id_impl(class.id).await.unwrap().is_none());
    }
}

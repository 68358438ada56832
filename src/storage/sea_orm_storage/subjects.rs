//! 学科存储操作

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    subjects::{entities::Subject, requests::SubjectListQuery, responses::SubjectListResponse},
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, name: String) -> Result<Subject> {
        let result = ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err("创建学科失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询学科失败", e))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_with_pagination_impl(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Subjects::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(like_contains(search.trim())));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询学科总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询学科列表失败", e))?;

        Ok(SubjectListResponse {
            items: items.into_iter().map(|m| m.into_subject()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_subject_impl(&self, id: i64, name: String) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let updated = ActiveModel {
            id: Set(id),
            name: Set(name),
        }
        .update(&self.db)
        .await
        .map_err(|e| map_write_err("更新学科失败", e))?;

        Ok(Some(updated.into_subject()))
    }

    /// 删除学科：教师能力级联删除，课节的学科置空
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除学科失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JournalError;

    #[tokio::test]
    async fn test_subject_crud() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let math = storage.create_subject_impl("Math".into()).await.unwrap();
        storage.create_subject_impl("Biology".into()).await.unwrap();

        let list = storage
            .list_subjects_with_pagination_impl(SubjectListQuery::default())
            .await
            .unwrap();
        assert_eq!(
            list.items.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["Biology", "Math"]
        );

        let renamed = storage
            .update_subject_impl(math.id, "Mathematics".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Mathematics");

        let err = storage
            .create_subject_impl("Biology".into())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::AlreadyExists(_)));

        assert!(storage.update_subject_impl(999, "X".into()).await.unwrap().is_none());
        assert!(storage.delete_subject_impl(math.id).await.unwrap());
        assert!(!storage.delete_subject_impl(math.id).await.unwrap());
    }
}

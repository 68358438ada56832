//! 分组存储操作

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::groups::{ActiveModel, Column, Entity as Groups};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    groups::{
        entities::Group,
        requests::{CreateGroupRequest, GroupListQuery, UpdateGroupRequest},
        responses::GroupListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_group_impl(&self, req: CreateGroupRequest) -> Result<Group> {
        let model = ActiveModel {
            name: Set(req.name),
            admission_year: Set(req.admission_year),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err("创建分组失败", e))?;

        Ok(result.into_group())
    }

    pub async fn get_group_by_id_impl(&self, id: i64) -> Result<Option<Group>> {
        let result = Groups::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询分组失败", e))?;

        Ok(result.map(|m| m.into_group()))
    }

    pub async fn get_group_by_name_impl(&self, name: &str) -> Result<Option<Group>> {
        let result = Groups::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询分组失败", e))?;

        Ok(result.map(|m| m.into_group()))
    }

    pub async fn list_groups_with_pagination_impl(
        &self,
        query: GroupListQuery,
    ) -> Result<GroupListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Groups::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(like_contains(search.trim())));
        }

        let paginator = select
            .order_by_desc(Column::AdmissionYear)
            .order_by_asc(Column::Name)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询分组总数失败", e))?;
        let groups = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询分组列表失败", e))?;

        Ok(GroupListResponse {
            items: groups.into_iter().map(|m| m.into_group()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_group_impl(
        &self,
        id: i64,
        update: UpdateGroupRequest,
    ) -> Result<Option<Group>> {
        let Some(existing) = Groups::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询分组失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(admission_year) = update.admission_year {
            model.admission_year = Set(admission_year);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err("更新分组失败", e))?;

        Ok(Some(updated.into_group()))
    }

    /// 删除分组：学生的分组置空，课节级联删除
    pub async fn delete_group_impl(&self, id: i64) -> Result<bool> {
        let result = Groups::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除分组失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JournalError;

    fn group(name: &str, year: i32) -> CreateGroupRequest {
        CreateGroupRequest {
            name: name.into(),
            admission_year: year,
        }
    }

    #[tokio::test]
    async fn test_group_crud() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage.create_group_impl(group("ИТ-21", 2021)).await.unwrap();

        let by_name = storage.get_group_by_name_impl("ИТ-21").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        let updated = storage
            .update_group_impl(
                created.id,
                UpdateGroupRequest {
                    admission_year: Some(2020),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "ИТ-21");
        assert_eq!(updated.admission_year, 2020);

        assert!(storage.delete_group_impl(created.id).await.unwrap());
        assert!(storage.get_group_by_id_impl(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_group_name() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage.create_group_impl(group("A-1", 2021)).await.unwrap();
        let other = storage.create_group_impl(group("A-2", 2021)).await.unwrap();

        let err = storage.create_group_impl(group("A-1", 2022)).await.unwrap_err();
        assert!(matches!(err, JournalError::AlreadyExists(_)));

        let err = storage
            .update_group_impl(
                other.id,
                UpdateGroupRequest {
                    name: Some("A-1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_groups_search() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage.create_group_impl(group("ИТ-21", 2021)).await.unwrap();
        storage.create_group_impl(group("М-22", 2022)).await.unwrap();
        storage.create_group_impl(group("100%_group", 2023)).await.unwrap();

        let all = storage
            .list_groups_with_pagination_impl(GroupListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);
        assert_eq!(all.items[0].admission_year, 2023);

        let found = storage
            .list_groups_with_pagination_impl(GroupListQuery {
                search: Some("%".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].name, "100%_group");
    }
}

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, PaginationQuery,
    classrooms::{
        entities::Classroom, requests::ClassroomListQuery, responses::ClassroomListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_classroom_impl(&self, name: String) -> Result<Classroom> {
        let result = ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_err("创建教室失败", e))?;

        Ok(result.into_classroom())
    }

    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_err("查询教室失败", e))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    pub async fn list_classrooms_with_pagination_impl(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let (page, size) = PaginationQuery::normalized(query.page, query.size);

        let mut select = Classrooms::find();
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(like_contains(search.trim())));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_err("查询教室总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_err("查询教室列表失败", e))?;

        Ok(ClassroomListResponse {
            items: items.into_iter().map(|m| m.into_classroom()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_classroom_impl(&self, id: i64, name: String) -> Result<Option<Classroom>> {
        if self.get_classroom_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let updated = ActiveModel {
            id: Set(id),
            name: Set(name),
        }
        .update(&self.db)
        .await
        .map_err(|e| map_write_err("更新教室失败", e))?;

        Ok(Some(updated.into_classroom()))
    }

    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_err("删除教室失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_classroom_search_and_rename() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let room = storage.create_classroom_impl("A-101".into()).await.unwrap();
        storage.create_classroom_impl("B-202".into()).await.unwrap();

        let found = storage
            .list_classrooms_with_pagination_impl(ClassroomListQuery {
                search: Some("101".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.items, vec![room.clone()]);

        let renamed = storage
            .update_classroom_impl(room.id, "A-102".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "A-102");
        assert!(storage.delete_classroom_impl(room.id).await.unwrap());
    }
}

//! 课节展示视图：批量加载分组、教师、学科与教室名称

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, map_read_err};
use crate::entity::{classes, classrooms, groups, subjects, user_identities};
use crate::errors::Result;
use crate::models::classes::entities::{ClassRead, teacher_short_name};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn distinct<I: IntoIterator<Item = i64>>(ids: I) -> Vec<i64> {
    ids.into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

impl SeaOrmStorage {
    /// 保持传入顺序
    pub(super) async fn build_class_reads(
        &self,
        models: Vec<classes::Model>,
    ) -> Result<Vec<ClassRead>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let group_ids = distinct(models.iter().map(|c| c.group_id));
        let teacher_ids = distinct(models.iter().filter_map(|c| c.teacher_id));
        let subject_ids = distinct(models.iter().filter_map(|c| c.subject_id));
        let classroom_ids = distinct(models.iter().filter_map(|c| c.classroom_id));

        let group_names: HashMap<i64, String> = groups::Entity::find()
            .filter(groups::Column::Id.is_in(group_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询分组失败", e))?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let teacher_names: HashMap<i64, String> = if teacher_ids.is_empty() {
            HashMap::new()
        } else {
            user_identities::Entity::find()
                .filter(user_identities::Column::Id.is_in(teacher_ids))
                .all(&self.db)
                .await
                .map_err(|e| map_read_err("查询教师失败", e))?
                .into_iter()
                .map(|u| (u.id, teacher_short_name(&u.surname, &u.name)))
                .collect()
        };

        let subject_names: HashMap<i64, String> = if subject_ids.is_empty() {
            HashMap::new()
        } else {
            subjects::Entity::find()
                .filter(subjects::Column::Id.is_in(subject_ids))
                .all(&self.db)
                .await
                .map_err(|e| map_read_err("查询学科失败", e))?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect()
        };

        let classroom_names: HashMap<i64, String> = if classroom_ids.is_empty() {
            HashMap::new()
        } else {
            classrooms::Entity::find()
                .filter(classrooms::Column::Id.is_in(classroom_ids))
                .all(&self.db)
                .await
                .map_err(|e| map_read_err("查询教室失败", e))?
                .into_iter()
                .map(|r| (r.id, r.name))
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|model| {
                let group = group_names.get(&model.group_id).cloned().unwrap_or_default();
                let teacher = model.teacher_id.and_then(|id| teacher_names.get(&id).cloned());
                let subject = model.subject_id.and_then(|id| subject_names.get(&id).cloned());
                let classroom = model
                    .classroom_id
                    .and_then(|id| classroom_names.get(&id).cloned());
                let class = model.into_class();
                ClassRead {
                    id: class.id,
                    group,
                    subject,
                    teacher,
                    classroom,
                    starts_at: class.starts_at,
                    ends_at: class.ends_at(),
                }
            })
            .collect())
    }
}

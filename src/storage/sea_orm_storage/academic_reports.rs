//! 学业记录存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_read_err, map_write_err};
use crate::entity::academic_reports::{self, ActiveModel, Column, Entity as AcademicReports};
use crate::entity::{classes, user_identities};
use crate::errors::Result;
use crate::models::academic_reports::{
    entities::{AcademicReport, AcademicReportRead},
    requests::AcademicReportItem,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};

/// 同一 (student_id, class_id) 只保留最后一条，顺序按首次出现
fn dedup_reports(reports: Vec<AcademicReportItem>) -> Vec<AcademicReportItem> {
    let mut positions: HashMap<(i64, i64), usize> = HashMap::new();
    let mut result: Vec<AcademicReportItem> = Vec::with_capacity(reports.len());
    for report in reports {
        let key = (report.student_id, report.class_id);
        match positions.get(&key) {
            Some(&pos) => result[pos] = report,
            None => {
                positions.insert(key, result.len());
                result.push(report);
            }
        }
    }
    result
}

impl SeaOrmStorage {
    /// 批量写入学业记录，同一事务内完成
    pub async fn upsert_academic_reports_impl(
        &self,
        reports: Vec<AcademicReportItem>,
    ) -> Result<Vec<AcademicReport>> {
        let reports = dedup_reports(reports);
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_read_err("开启事务失败", e))?;

        let mut stored = Vec::with_capacity(reports.len());
        for report in reports {
            let model = ActiveModel {
                student_id: Set(report.student_id),
                class_id: Set(report.class_id),
                is_attended: Set(report.is_attended),
                grade: Set(report.grade.map(|g| g.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            AcademicReports::insert(model)
                .on_conflict(
                    OnConflict::columns([Column::StudentId, Column::ClassId])
                        .update_columns([Column::IsAttended, Column::Grade, Column::UpdatedAt])
                        .to_owned(),
                )
                .exec(&txn)
                .await
                .map_err(|e| map_write_err("写入学业记录失败", e))?;

            let row = AcademicReports::find()
                .filter(Column::StudentId.eq(report.student_id))
                .filter(Column::ClassId.eq(report.class_id))
                .one(&txn)
                .await
                .map_err(|e| map_read_err("查询学业记录失败", e))?;
            if let Some(row) = row {
                stored.push(row.into_academic_report());
            }
        }

        txn.commit()
            .await
            .map_err(|e| map_write_err("提交事务失败", e))?;

        Ok(stored)
    }

    /// 组装展示视图，保持传入顺序
    async fn build_report_reads(
        &self,
        rows: Vec<(academic_reports::Model, classes::Model)>,
    ) -> Result<Vec<AcademicReportRead>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut student_ids: Vec<i64> = rows.iter().map(|(r, _)| r.student_id).collect();
        student_ids.sort_unstable();
        student_ids.dedup();

        let student_names: HashMap<i64, String> = user_identities::Entity::find()
            .filter(user_identities::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询学生失败", e))?
            .into_iter()
            .map(|u| (u.id, format!("{} {}", u.surname, u.name)))
            .collect();

        let (reports, lessons): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let lessons = self.build_class_reads(lessons).await?;

        Ok(reports
            .into_iter()
            .zip(lessons)
            .map(|(report, lesson)| {
                let student = student_names
                    .get(&report.student_id)
                    .cloned()
                    .unwrap_or_default();
                let report = report.into_academic_report();
                AcademicReportRead {
                    id: report.id,
                    student,
                    is_attended: report.is_attended,
                    grade: report.grade,
                    lesson,
                }
            })
            .collect())
    }

    /// 学生在 [from, to) 内开始的课节上的记录
    pub async fn list_student_reports_between_impl(
        &self,
        student_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AcademicReportRead>> {
        let rows = AcademicReports::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(classes::Entity)
            .filter(classes::Column::StartsAt.gte(from.timestamp()))
            .filter(classes::Column::StartsAt.lt(to.timestamp()))
            .order_by_asc(classes::Column::StartsAt)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询学业记录失败", e))?;

        let rows = rows
            .into_iter()
            .filter_map(|(report, class)| class.map(|c| (report, c)))
            .collect();
        self.build_report_reads(rows).await
    }

    /// 某节课的全部记录
    pub async fn list_class_reports_impl(&self, class_id: i64) -> Result<Vec<AcademicReportRead>> {
        let rows = AcademicReports::find()
            .filter(Column::ClassId.eq(class_id))
            .find_also_related(classes::Entity)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| map_read_err("查询学业记录失败", e))?;

        let rows = rows
            .into_iter()
            .filter_map(|(report, class)| class.map(|c| (report, c)))
            .collect();
        self.build_report_reads(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        academic_reports::entities::Grade, classes::requests::CreateClassRequest,
        groups::requests::CreateGroupRequest, students::requests::StudentRegisterRequest,
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
        let student = storage
            .create_student_impl(
                StudentRegisterRequest {
                    name: "Olga".into(),
                    surname: "Sidorova".into(),
                    date_of_birth: None,
                    email: "olga@sirius.edu".into(),
                    password: "hashed".into(),
                    group_name: "ИТ-21".into(),
                },
                Some(group.id),
            )
            .await
            .unwrap();
        let class = storage
            .create_class_impl(CreateClassRequest {
                starts_at: Utc.with_ymd_and_hms(2024, 3, 27, 10, 0, 0).unwrap(),
                duration_minutes: Some(90),
                group_id: group.id,
                teacher_id: None,
                subject_id: None,
                classroom_id: None,
            })
            .await
            .unwrap();
        (storage, student.id, class.id)
    }

    fn item(student_id: i64, class_id: i64, attended: bool, grade: Option<Grade>) -> AcademicReportItem {
        AcademicReportItem {
            student_id,
            class_id,
            is_attended: attended,
            grade,
        }
    }

    #[test]
    fn test_dedup_keeps_last() {
        let reports = vec![
            item(1, 1, false, None),
            item(2, 1, true, None),
            item(1, 1, true, Some(Grade::Good)),
        ];
        let deduped = dedup_reports(reports);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].student_id, 1);
        assert_eq!(deduped[0].grade, Some(Grade::Good));
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let (storage, student_id, class_id) = seed().await;

        let first = storage
            .upsert_academic_reports_impl(vec![item(student_id, class_id, false, None)])
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert!(!first[0].is_attended);

        let second = storage
            .upsert_academic_reports_impl(vec![item(
                student_id,
                class_id,
                true,
                Some(Grade::Excellent),
            )])
            .await
            .unwrap();
        assert_eq!(second[0].id, first[0].id);
        assert!(second[0].is_attended);
        assert_eq!(second[0].grade, Some(Grade::Excellent));

        let reads = storage.list_class_reports_impl(class_id).await.unwrap();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].student, "Sidorova Olga");
        assert_eq!(reads[0].lesson.group, "ИТ-21");
    }

    #[tokio::test]
    async fn test_student_reports_in_window() {
        let (storage, student_id, class_id) = seed().await;
        storage
            .upsert_academic_reports_impl(vec![item(student_id, class_id, true, Some(Grade::Good))])
            .await
            .unwrap();

        let monday = Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap();
        let week = storage
            .list_student_reports_between_impl(
                student_id,
                monday,
                monday + chrono::Duration::days(7),
            )
            .await
            .unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].grade, Some(Grade::Good));

        let next_week = storage
            .list_student_reports_between_impl(
                student_id,
                monday + chrono::Duration::days(7),
                monday + chrono::Duration::days(14),
            )
            .await
            .unwrap();
        assert!(next_week.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_unknown_class_fails_atomically() {
        let (storage, student_id, class_id) = seed().await;
        let result = storage
            .upsert_academic_reports_impl(vec![
                item(student_id, class_id, true, None),
                item(student_id, 9999, true, None),
            ])
            .await;
        assert!(result.is_err());
        assert!(storage.list_class_reports_impl(class_id).await.unwrap().is_empty());
    }
}

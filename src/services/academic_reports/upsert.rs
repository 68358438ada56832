use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::info;

use super::AcademicReportService;
use crate::models::{
    ApiResponse, ErrorCode,
    academic_reports::{
        requests::{AcademicReportItem, MAX_REPORTS_PER_REQUEST, UpsertAcademicReportsRequest},
        responses::UpsertAcademicReportsResponse,
    },
    classes::entities::Class,
    users::entities::UserRole,
};
use crate::services::{current_user, internal_error};

/// 拒绝写入的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRejection {
    ClassNotFound(i64),
    NotClassTeacher(i64),
    StudentNotFound(i64),
    StudentNotInGroup { student_id: i64, class_id: i64 },
}

impl ReportRejection {
    fn into_response(self) -> HttpResponse {
        match self {
            ReportRejection::ClassNotFound(id) => HttpResponse::NotFound().json(
                ApiResponse::error_empty(ErrorCode::ClassNotFound, format!("Class {id} not found")),
            ),
            ReportRejection::NotClassTeacher(id) => {
                HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::PermissionDenied,
                    format!("You do not teach class {id}"),
                ))
            }
            ReportRejection::StudentNotFound(id) => {
                HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::StudentNotFound,
                    format!("Student {id} not found"),
                ))
            }
            ReportRejection::StudentNotInGroup {
                student_id,
                class_id,
            } => HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StudentNotInClassGroup,
                format!("Student {student_id} does not attend class {class_id}"),
            )),
        }
    }
}

/// 依次检查：课节存在、教师权限、学生存在、学生属于课节分组
///
/// `teacher_id` 为 None 表示管理员，不限制课节归属。
pub fn check_reports(
    reports: &[AcademicReportItem],
    classes: &HashMap<i64, Class>,
    student_groups: &HashMap<i64, Option<i64>>,
    teacher_id: Option<i64>,
) -> Result<(), ReportRejection> {
    for report in reports {
        if !classes.contains_key(&report.class_id) {
            return Err(ReportRejection::ClassNotFound(report.class_id));
        }
    }

    if let Some(teacher_id) = teacher_id {
        for report in reports {
            if let Some(class) = classes.get(&report.class_id)
                && class.teacher_id != Some(teacher_id)
            {
                return Err(ReportRejection::NotClassTeacher(report.class_id));
            }
        }
    }

    for report in reports {
        let Some(group_id) = student_groups.get(&report.student_id) else {
            return Err(ReportRejection::StudentNotFound(report.student_id));
        };
        let class_group = classes.get(&report.class_id).map(|c| c.group_id);
        if *group_id != class_group {
            return Err(ReportRejection::StudentNotInGroup {
                student_id: report.student_id,
                class_id: report.class_id,
            });
        }
    }

    Ok(())
}

fn distinct_ids(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub async fn upsert_reports(
    service: &AcademicReportService,
    reports: UpsertAcademicReportsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let reports = reports.reports;
    if reports.is_empty() || reports.len() > MAX_REPORTS_PER_REQUEST {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AcademicReportInvalid,
            format!("Reports count must be between 1 and {MAX_REPORTS_PER_REQUEST}"),
        )));
    }

    let storage = service.get_storage(request);

    let class_ids = distinct_ids(reports.iter().map(|r| r.class_id));
    let classes: HashMap<i64, Class> = match storage.get_classes_by_ids(&class_ids).await {
        Ok(classes) => classes.into_iter().map(|c| (c.id, c)).collect(),
        Err(e) => return Ok(internal_error("Failed to save academic reports", e)),
    };

    let student_ids = distinct_ids(reports.iter().map(|r| r.student_id));
    let student_groups = match storage.get_student_groups(&student_ids).await {
        Ok(groups) => groups,
        Err(e) => return Ok(internal_error("Failed to save academic reports", e)),
    };

    let teacher_id = (user.role != UserRole::Admin).then_some(user.id);
    if let Err(rejection) = check_reports(&reports, &classes, &student_groups, teacher_id) {
        return Ok(rejection.into_response());
    }

    match storage.upsert_academic_reports(reports).await {
        Ok(items) => {
            info!("User {} saved {} academic reports", user.id, items.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UpsertAcademicReportsResponse { items },
                "Academic reports saved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to save academic reports", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn class(id: i64, group_id: i64, teacher_id: Option<i64>) -> Class {
        let now = Utc::now();
        Class {
            id,
            starts_at: now,
            duration_minutes: 90,
            group_id,
            teacher_id,
            subject_id: None,
            classroom_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(student_id: i64, class_id: i64) -> AcademicReportItem {
        AcademicReportItem {
            student_id,
            class_id,
            is_attended: true,
            grade: None,
        }
    }

    fn fixtures() -> (HashMap<i64, Class>, HashMap<i64, Option<i64>>) {
        let classes = HashMap::from([(10, class(10, 1, Some(100))), (11, class(11, 2, None))]);
        let students = HashMap::from([(1, Some(1)), (2, Some(2)), (3, None)]);
        (classes, students)
    }

    #[test]
    fn test_admin_valid_reports() {
        let (classes, students) = fixtures();
        let reports = vec![item(1, 10), item(2, 11)];
        assert_eq!(check_reports(&reports, &classes, &students, None), Ok(()));
    }

    #[test]
    fn test_unknown_class_checked_first() {
        let (classes, students) = fixtures();
        let reports = vec![item(99, 10), item(1, 12)];
        assert_eq!(
            check_reports(&reports, &classes, &students, None),
            Err(ReportRejection::ClassNotFound(12))
        );
    }

    #[test]
    fn test_teacher_limited_to_own_classes() {
        let (classes, students) = fixtures();
        assert_eq!(
            check_reports(&[item(1, 10)], &classes, &students, Some(100)),
            Ok(())
        );
        assert_eq!(
            check_reports(&[item(2, 11)], &classes, &students, Some(100)),
            Err(ReportRejection::NotClassTeacher(11))
        );
    }

    #[test]
    fn test_student_must_exist_and_belong_to_group() {
        let (classes, students) = fixtures();
        assert_eq!(
            check_reports(&[item(42, 10)], &classes, &students, None),
            Err(ReportRejection::StudentNotFound(42))
        );
        assert_eq!(
            check_reports(&[item(2, 10)], &classes, &students, None),
            Err(ReportRejection::StudentNotInGroup {
                student_id: 2,
                class_id: 10
            })
        );
        // 未分组的学生不属于任何课节
        assert_eq!(
            check_reports(&[item(3, 10)], &classes, &students, None),
            Err(ReportRejection::StudentNotInGroup {
                student_id: 3,
                class_id: 10
            })
        );
    }

    #[test]
    fn test_distinct_ids() {
        assert_eq!(distinct_ids([3, 1, 3, 2, 1].into_iter()), vec![1, 2, 3]);
    }
}

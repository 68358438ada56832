//! 课节写入前的校验：时长、引用对象存在、教师能力

use actix_web::HttpResponse;
use std::sync::Arc;

use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::storage::Storage;

pub const MAX_CLASS_DURATION_MINUTES: i32 = 24 * 60;

/// 合并后的课节字段
#[derive(Debug, Clone, Copy)]
pub struct ClassDraft {
    pub duration_minutes: i32,
    pub group_id: i64,
    pub teacher_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

pub fn duration_in_range(duration_minutes: i32) -> bool {
    (1..=MAX_CLASS_DURATION_MINUTES).contains(&duration_minutes)
}

fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub async fn check_class_draft(
    storage: &Arc<dyn Storage>,
    draft: &ClassDraft,
) -> Result<(), HttpResponse> {
    if !duration_in_range(draft.duration_minutes) {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassInvalidDuration,
            format!("Class duration must be between 1 and {MAX_CLASS_DURATION_MINUTES} minutes"),
        )));
    }

    match storage.get_group_by_id(draft.group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(not_found(ErrorCode::GroupNotFound, "Group not found")),
        Err(e) => return Err(internal_error("Failed to validate class", e)),
    }

    let teacher = match draft.teacher_id {
        Some(teacher_id) => match storage.get_teacher_by_id(teacher_id).await {
            Ok(Some(teacher)) => Some(teacher),
            Ok(None) => return Err(not_found(ErrorCode::TeacherNotFound, "Teacher not found")),
            Err(e) => return Err(internal_error("Failed to validate class", e)),
        },
        None => None,
    };

    if let Some(subject_id) = draft.subject_id {
        match storage.get_subject_by_id(subject_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
            Err(e) => return Err(internal_error("Failed to validate class", e)),
        }
    }

    if let Some(classroom_id) = draft.classroom_id {
        match storage.get_classroom_by_id(classroom_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(not_found(ErrorCode::ClassroomNotFound, "Classroom not found"));
            }
            Err(e) => return Err(internal_error("Failed to validate class", e)),
        }
    }

    // 教师与学科同时存在时，必须是该教师的能力
    if let (Some(teacher), Some(subject_id)) = (teacher, draft.subject_id) {
        match storage.has_competence(teacher.id, subject_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::TeacherNoCompetence,
                    format!(
                        "Teacher {} {} has no competence for this subject",
                        teacher.surname, teacher.name
                    ),
                )));
            }
            Err(e) => return Err(internal_error("Failed to validate class", e)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_bounds() {
        assert!(!duration_in_range(0));
        assert!(duration_in_range(1));
        assert!(duration_in_range(90));
        assert!(duration_in_range(1440));
        assert!(!duration_in_range(1441));
        assert!(!duration_in_range(-45));
    }
}

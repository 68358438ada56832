use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use super::validate::{ClassDraft, check_class_draft};
use crate::models::ApiResponse;
use crate::models::classes::requests::CreateClassRequest;
use crate::services::internal_error;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 未指定时长时使用默认值
    let duration_minutes = class_data
        .duration_minutes
        .unwrap_or(service.get_config().journal.default_class_duration_minutes);
    class_data.duration_minutes = Some(duration_minutes);

    let draft = ClassDraft {
        duration_minutes,
        group_id: class_data.group_id,
        teacher_id: class_data.teacher_id,
        subject_id: class_data.subject_id,
        classroom_id: class_data.classroom_id,
    };
    if let Err(resp) = check_class_draft(&storage, &draft).await {
        return Ok(resp);
    }

    let class = match storage.create_class(class_data).await {
        Ok(class) => class,
        Err(e) => return Ok(internal_error("Class creation failed", e)),
    };

    info!("Class {} created for group {}", class.id, class.group_id);

    match storage.get_class_read(class.id).await {
        Ok(Some(read)) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(read, "Class created successfully"))),
        Ok(None) => Ok(internal_error(
            "Class creation failed",
            "created class disappeared",
        )),
        Err(e) => Ok(internal_error("Class creation failed", e)),
    }
}

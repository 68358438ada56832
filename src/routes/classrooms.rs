use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classrooms::requests::{ClassroomListParams, ClassroomRequest};
use crate::models::users::entities::UserRole;
use crate::services::ClassroomService;
use crate::utils::SafeIDI64;

static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);

pub async fn list_classrooms(
    req: HttpRequest,
    query: web::Query<ClassroomListParams>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.list_classrooms(query.into_inner(), &req).await
}

pub async fn create_classroom(
    req: HttpRequest,
    classroom_data: web::Json<ClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.create_classroom(classroom_data.into_inner(), &req).await
}

pub async fn update_classroom(
    req: HttpRequest,
    classroom_id: SafeIDI64,
    classroom_data: web::Json<ClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .update_classroom(classroom_id.0, classroom_data.into_inner(), &req)
        .await
}

pub async fn delete_classroom(req: HttpRequest, classroom_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.delete_classroom(classroom_id.0, &req).await
}

pub fn configure_classroom_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classrooms")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_classrooms))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::post().to(create_classroom))
                    .route("/{id}", web::put().to(update_classroom))
                    .route("/{id}", web::delete().to(delete_classroom)),
            ),
    );
}

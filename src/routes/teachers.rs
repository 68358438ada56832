use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::WeekOffsetQuery;
use crate::models::teachers::requests::{TeacherRegisterRequest, UpdateCompetenciesRequest};
use crate::models::users::entities::UserRole;
use crate::services::TeacherService;
use crate::utils::{SafeIDI64, SafeTeacherRef};

static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn register_teacher(
    req: HttpRequest,
    register_data: web::Json<TeacherRegisterRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .register(register_data.into_inner(), &req)
        .await
}

pub async fn get_teacher(req: HttpRequest, teacher: SafeTeacherRef) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(teacher.0, &req).await
}

pub async fn get_teacher_schedule(
    req: HttpRequest,
    teacher: SafeTeacherRef,
    query: web::Query<WeekOffsetQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .get_schedule(teacher.0, query.offset, &req)
        .await
}

pub async fn list_competencies(
    req: HttpRequest,
    teacher: SafeTeacherRef,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_competencies(teacher.0, &req).await
}

pub async fn replace_competencies(
    req: HttpRequest,
    teacher_id: SafeIDI64,
    update_data: web::Json<UpdateCompetenciesRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .replace_competencies(teacher_id.0, update_data.into_inner(), &req)
        .await
}

// 注册是否需要管理员由服务层根据配置判断
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .route(
                "",
                web::post()
                    .to(register_teacher)
                    .wrap(RateLimit::register()),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/{id}", web::get().to(get_teacher))
                    .route("/{id}/schedule", web::get().to(get_teacher_schedule))
                    .service(
                        web::resource("/{id}/competencies")
                            .route(web::get().to(list_competencies))
                            .route(
                                web::put()
                                    .to(replace_competencies)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            ),
                    ),
            ),
    );
}

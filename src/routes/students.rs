use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::WeekOffsetQuery;
use crate::models::students::requests::{StudentRegisterRequest, UpdateStudentRequest};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::{SafeIDI64, SafeStudentRef};

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn register_student(
    req: HttpRequest,
    register_data: web::Json<StudentRegisterRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .register(register_data.into_inner(), &req)
        .await
}

pub async fn get_student(req: HttpRequest, student: SafeStudentRef) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(student.0, &req).await
}

pub async fn get_student_schedule(
    req: HttpRequest,
    student: SafeStudentRef,
    query: web::Query<WeekOffsetQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .get_schedule(student.0, query.offset, &req)
        .await
}

pub async fn get_student_academic_reports(
    req: HttpRequest,
    student: SafeStudentRef,
    query: web::Query<WeekOffsetQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .get_academic_reports(student.0, query.offset, &req)
        .await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(student_id.0, update_data.into_inner(), &req)
        .await
}

// 注册公开，其余需要登录
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .route(
                "",
                web::post()
                    .to(register_student)
                    .wrap(RateLimit::register()),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::resource("/{id}")
                            // id 或 me，只有本人、教师和管理员可读
                            .route(web::get().to(get_student))
                            .route(
                                web::put()
                                    .to(update_student)
                                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                            ),
                    )
                    .route("/{id}/schedule", web::get().to(get_student_schedule))
                    .route(
                        "/{id}/academic-reports",
                        web::get().to(get_student_academic_reports),
                    ),
            ),
    );
}

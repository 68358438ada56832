//! 通过完整的路由与中间件栈发起请求，验证状态码与错误码

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::cache::{ObjectCache, object_cache::moka::MokaCacheWrapper};
use crate::models::{
    ErrorCode,
    classes::requests::CreateClassRequest,
    groups::requests::CreateGroupRequest,
    students::requests::StudentRegisterRequest,
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use crate::utils::jwt::JwtUtils;
use crate::utils::{json_error_handler, query_error_handler};

macro_rules! journal_app {
    ($storage:expr) => {{
        let storage: Arc<dyn Storage> = Arc::new($storage);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(1_000, 60));
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .configure(super::configure_student_routes)
                .configure(super::configure_academic_report_routes)
                .configure(super::configure_admin_routes),
        )
        .await
    }};
}

async fn seed_user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            name: "Maria".into(),
            surname: "Orlova".into(),
            email: email.into(),
            password: "hashed".into(),
            role,
            date_of_birth: None,
            profile_photo_uri: None,
        })
        .await
        .unwrap()
}

fn student_request(email: &str) -> StudentRegisterRequest {
    StudentRegisterRequest {
        name: "Ivan".into(),
        surname: "Ivanov".into(),
        date_of_birth: None,
        email: email.into(),
        password: "hashed".into(),
        group_name: String::new(),
    }
}

fn bearer(user_id: i64, role: UserRole) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user_id, &role.to_string()).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

fn error_code(body: &Value) -> i64 {
    body["code"].as_i64().unwrap()
}

#[actix_web::test]
async fn test_register_student_duplicate_email() {
    let app = journal_app!(SeaOrmStorage::new_in_memory().await.unwrap());
    let body = json!({
        "name": "Ivan",
        "surname": "Ivanov",
        "email": "Ivan@Sirius.edu",
        "password": "Journal2024x"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .insert_header(("X-Forwarded-For", "10.20.0.1"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["student"]["email"], "ivan@sirius.edu");
    assert!(created["data"]["token"].as_str().is_some());

    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .insert_header(("X-Forwarded-For", "10.20.0.1"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let rejected: Value = test::read_body_json(resp).await;
    assert_eq!(
        error_code(&rejected),
        ErrorCode::UserEmailAlreadyExists as i64
    );
}

#[actix_web::test]
async fn test_student_cannot_read_other_student() {
    let storage = SeaOrmStorage::new_in_memory().await.unwrap();
    let me = storage
        .create_student_impl(student_request("me@sirius.edu"), None)
        .await
        .unwrap();
    let other = storage
        .create_student_impl(student_request("other@sirius.edu"), None)
        .await
        .unwrap();
    let app = journal_app!(storage);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{}", other.id))
        .insert_header(bearer(me.id, UserRole::Student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), ErrorCode::PermissionDenied as i64);

    let req = test::TestRequest::get()
        .uri("/api/v1/students/me")
        .insert_header(bearer(me.id, UserRole::Student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_missing_student_is_not_found() {
    let storage = SeaOrmStorage::new_in_memory().await.unwrap();
    let admin = seed_user(&storage, "head@sirius.edu", UserRole::Admin).await;
    let app = journal_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/students/4242")
        .insert_header(bearer(admin.id, UserRole::Admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), ErrorCode::StudentNotFound as i64);
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = journal_app!(SeaOrmStorage::new_in_memory().await.unwrap());
    let req = test::TestRequest::get()
        .uri("/api/v1/students/me")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_teacher_cannot_grade_other_teachers_class() {
    let storage = SeaOrmStorage::new_in_memory().await.unwrap();
    let owner = seed_user(&storage, "owner@sirius.edu", UserRole::Teacher).await;
    let stranger = seed_user(&storage, "stranger@sirius.edu", UserRole::Teacher).await;
    let group = storage
        .create_group_impl(CreateGroupRequest {
            name: "ИТ-21".into(),
            admission_year: 2021,
        })
        .await
        .unwrap();
    let student = storage
        .create_student_impl(student_request("pupil@sirius.edu"), Some(group.id))
        .await
        .unwrap();
    let class = storage
        .create_class_impl(CreateClassRequest {
            starts_at: chrono::Utc::now(),
            duration_minutes: Some(90),
            group_id: group.id,
            teacher_id: Some(owner.id),
            subject_id: None,
            classroom_id: None,
        })
        .await
        .unwrap();
    let app = journal_app!(storage);

    let body = json!({
        "reports": [{
            "student_id": student.id,
            "class_id": class.id,
            "is_attended": true,
            "grade": "good"
        }]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/academic-reports")
        .insert_header(bearer(stranger.id, UserRole::Teacher))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let rejected: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&rejected), ErrorCode::PermissionDenied as i64);

    let req = test::TestRequest::post()
        .uri("/api/v1/academic-reports")
        .insert_header(bearer(owner.id, UserRole::Teacher))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 学生没有写入权限
    let req = test::TestRequest::post()
        .uri("/api/v1/academic-reports")
        .insert_header(bearer(student.id, UserRole::Student))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_admin_cannot_demote_self() {
    let storage = SeaOrmStorage::new_in_memory().await.unwrap();
    let admin = seed_user(&storage, "root@sirius.edu", UserRole::Admin).await;
    let app = journal_app!(storage);

    for patch in [json!({"role": "teacher"}), json!({"is_active": false})] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/admin/users/{}", admin.id))
            .insert_header(bearer(admin.id, UserRole::Admin))
            .set_json(&patch)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_code(&body), ErrorCode::CanNotDemoteCurrentUser as i64);
    }

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/users/{}", admin.id))
        .insert_header(bearer(admin.id, UserRole::Admin))
        .set_json(json!({"surname": "Volkova"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

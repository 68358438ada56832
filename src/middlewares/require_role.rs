/*!
 * 基于角色的访问控制中间件
 *
 * 必须套在 RequireJWT 之内使用（先认证，再判断角色）。
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_classes).wrap(RequireRole::new_any(UserRole::teacher_roles())))
 *     .route("", web::post().to(create_class).wrap(RequireRole::new(&UserRole::Admin)))
 * ```
 *
 * 学生只能读自己、教师只能读自己的课这类按资源判断的规则在服务层完成。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, users::entities::UserRole},
};

/// 用户角色是否在允许列表中
pub(crate) fn role_allowed(user_role: UserRole, allowed: &[UserRole]) -> bool {
    allowed.contains(&user_role)
}

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 仅允许一个角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: Rc::from([*role]),
        }
    }

    /// 允许列表中的任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|role| **role).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let Some(user) = RequireJWT::extract_user_claims(req.request()) else {
                info!("Role check without an authenticated user, is RequireJWT applied?");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if !role_allowed(user.role, &allowed) {
                info!(
                    "Access denied for user {} (role: {}), allowed: {:?}",
                    user.id, user.role, allowed
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::PermissionDenied,
                        "You do not have permission to perform this action",
                    )
                    .map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_allowed() {
        let teachers = RequireRole::new_any(UserRole::teacher_roles());
        assert!(role_allowed(UserRole::Teacher, &teachers.allowed));
        assert!(role_allowed(UserRole::Admin, &teachers.allowed));
        assert!(!role_allowed(UserRole::Student, &teachers.allowed));

        let admin = RequireRole::new(&UserRole::Admin);
        assert!(role_allowed(UserRole::Admin, &admin.allowed));
        assert!(!role_allowed(UserRole::Teacher, &admin.allowed));
    }
}

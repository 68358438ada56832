//! 邮箱确认
//!
//! 令牌保存在缓存中（`verify:{token}` → 用户 ID），通过邮件发给用户；未配置 SMTP 时写入日志。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::cache::{CacheResult, get_json, insert_json};
use crate::mail::confirmation_mail;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::auth::requests::VerifyEmailRequest;
use crate::models::auth::responses::TokenIssuedResponse;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::utils::jwt::JwtUtils;
use crate::utils::random_code::generate_token;

use super::AuthService;

pub fn verification_cache_key(token: &str) -> String {
    format!("verify:{token}")
}

pub async fn handle_request_verify(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if user.is_verified {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AlreadyVerified,
            "Email is already confirmed",
        )));
    }

    let Some(cache) = service.get_cache(request) else {
        return Ok(internal_error(
            "Failed to issue confirmation token",
            "cache is not configured",
        ));
    };

    let config = service.get_config();
    let ttl = config.journal.verification_token_ttl;
    let token = generate_token();
    let key = verification_cache_key(&token);
    insert_json(&*cache, key.clone(), &user.id, ttl).await;

    match service.get_mailer(request) {
        Some(mailer) => {
            let mail = confirmation_mail(&config.app.system_name, &token, ttl);
            if let Err(e) = mailer.send(&user.email, &mail).await {
                cache.remove(&key).await;
                return Ok(internal_error("Failed to send confirmation email", e));
            }
            info!("Email confirmation token sent to user {}", user.id);
        }
        None => info!(
            "Email confirmation token for {} (user {}): {}",
            user.email, user.id, token
        ),
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenIssuedResponse { expires_in: ttl },
        "Confirmation token has been sent",
    )))
}

pub async fn handle_verify_email(
    service: &AuthService,
    verify_request: VerifyEmailRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let Some(cache) = service.get_cache(request) else {
        return Ok(internal_error(
            "Failed to confirm email",
            "cache is not configured",
        ));
    };

    let key = verification_cache_key(verify_request.token.trim());
    let owner_id = match get_json::<i64>(&*cache, &key).await {
        CacheResult::Found(id) => id,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidConfirmationToken,
                "Confirmation token is not exist or expired",
            )));
        }
    };

    if owner_id != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::InvalidIdentity,
            "You can not confirm email of the other person",
        )));
    }

    let storage = service.get_storage(request);
    let update = UpdateUserRequest {
        is_verified: Some(true),
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(Some(user)) => {
            cache.remove(&key).await;
            if let Some(token) = JwtUtils::extract_bearer_token(request) {
                cache.remove(&user_cache_key(&token)).await;
            }
            info!("User {} confirmed email", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Email confirmed successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(internal_error("Failed to confirm email", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_cache_key() {
        assert_eq!(verification_cache_key("abc"), "verify:abc");
    }
}

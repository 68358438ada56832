use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::cache::{CacheResult, get_json, insert_json};
use crate::mail::reset_mail;
use crate::models::auth::requests::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_token;
use crate::utils::validate::{normalize_email, validate_password_simple};

use super::AuthService;

pub fn reset_cache_key(token: &str) -> String {
    format!("reset:{token}")
}

fn invalid_reset_token() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidResetToken,
        "Reset token is not exist or expired",
    ))
}

/// 无论邮箱是否存在都返回 202，避免暴露注册情况
pub async fn handle_forgot_password(
    service: &AuthService,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let accepted = || {
        HttpResponse::Accepted().json(ApiResponse::success_empty(
            "If the email is registered, a reset token has been sent",
        ))
    };

    let email = normalize_email(&forgot_request.email);
    let storage = service.get_storage(request);

    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => return Ok(accepted()),
        Err(e) => return Ok(internal_error("Failed to process password reset", e)),
    };

    let Some(cache) = service.get_cache(request) else {
        warn!("Password reset requested but cache is not configured");
        return Ok(accepted());
    };

    let config = service.get_config();
    let ttl = config.journal.reset_token_ttl;
    let token = generate_token();
    let key = reset_cache_key(&token);
    insert_json(&*cache, key.clone(), &user.id, ttl).await;

    match service.get_mailer(request) {
        Some(mailer) => {
            let mail = reset_mail(&config.app.system_name, &token, ttl);
            // 发信失败也返回 202，令牌作废
            if let Err(e) = mailer.send(&user.email, &mail).await {
                error!("Password reset mail for user {} failed: {}", user.id, e);
                cache.remove(&key).await;
            } else {
                info!("Password reset token sent to user {}", user.id);
            }
        }
        None => info!(
            "Password reset token for {} (user {}): {}",
            user.email, user.id, token
        ),
    }

    Ok(accepted())
}

pub async fn handle_reset_password(
    service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(cache) = service.get_cache(request) else {
        return Ok(invalid_reset_token());
    };

    let key = reset_cache_key(reset_request.token.trim());
    let user_id = match get_json::<i64>(&*cache, &key).await {
        CacheResult::Found(id) => id,
        _ => return Ok(invalid_reset_token()),
    };

    if let Err(msg) = validate_password_simple(&reset_request.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            msg,
        )));
    }

    let password = match hash_password(&reset_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    let storage = service.get_storage(request);
    let update = UpdateUserRequest {
        password: Some(password),
        ..Default::default()
    };

    match storage.update_user(user_id, update).await {
        Ok(Some(_)) => {
            cache.remove(&key).await;
            info!("User {} reset password", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password has been reset successfully",
            )))
        }
        Ok(None) => {
            cache.remove(&key).await;
            Ok(invalid_reset_token())
        }
        Err(e) => Ok(internal_error("Failed to reset password", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_cache_key() {
        assert_eq!(reset_cache_key("abc"), "reset:abc");
    }
}

/*!
 * 速率限制中间件
 *
 * 此中间件用于限制请求频率，防止暴力破解和 DDoS 攻击。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::rate_limit::RateLimit;
 *
 * web::scope("/api/v1/students")
 *     .route("", web::post().to(register_student).wrap(RateLimit::register())) // 5次/分钟
 * ```
 *
 * ## 限制规则
 *
 * - 未认证请求使用客户端 IP 作为限制键，已认证请求使用用户 ID
 * - 固定窗口计数，窗口从第一次请求开始
 * - 超过限制返回 429 Too Many Requests，并带 Retry-After
 * - 放行的响应附带 X-RateLimit-Limit / X-RateLimit-Remaining
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 全局速率限制缓存
/// 键: 路由前缀:标识，值: (窗口内请求计数, 窗口开始时间)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (u32, Instant)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(600))
        .max_capacity(100_000)
        .build()
});

/// 固定窗口计数：返回本次请求后的计数，窗口过期则重新开始
fn next_count(previous: Option<(u32, Instant)>, now: Instant, window: Duration) -> (u32, Instant) {
    match previous {
        Some((count, started)) if now.duration_since(started) < window => {
            (count.saturating_add(1), started)
        }
        _ => (1, now),
    }
}

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册端点限制：5次/分钟/IP
    pub fn register() -> Self {
        Self::new(5, 60).with_prefix("register")
    }

    /// 刷新令牌限制：10次/分钟/IP（防止暴力攻击）
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 找回密码限制：3次/分钟/IP（防止借此刷令牌）
    pub fn password_reset() -> Self {
        Self::new(3, 60).with_prefix("password_reset")
    }
}

/// 限制键：已认证用户按 ID，否则按客户端 IP
///
/// 连接信息已经考虑了 Forwarded / X-Forwarded-For，X-Real-IP 作为补充。
/// 直接暴露在不可信网络时转发头可被伪造。
fn limit_identifier(req: &ServiceRequest) -> String {
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }

    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    let real_ip = req
        .headers()
        .get("X-Real-IP")
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    let ip = connection_ip
        .as_deref()
        .into_iter()
        .chain(real_ip)
        .find(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_string);
    format!("ip:{}", ip.unwrap_or_else(|| "unknown".to_string()))
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identifier = limit_identifier(&req);
            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{key_prefix}:{identifier}")
            };

            let now = Instant::now();
            let window = Duration::from_secs(window_secs);
            let (count, started) =
                next_count(RATE_LIMIT_CACHE.get(&cache_key).await, now, window);

            // 检查是否超过限制
            if count > max_requests {
                let retry_after = window
                    .saturating_sub(now.duration_since(started))
                    .as_secs()
                    .max(1);
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, count, max_requests
                );
                return Ok(req
                    .into_response(create_rate_limit_response(retry_after).map_into_right_body()));
            }

            RATE_LIMIT_CACHE.insert(cache_key.clone(), (count, started)).await;

            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(max_requests.saturating_sub(count)),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let register = RateLimit::register();
        assert_eq!(register.max_requests, 5);
        assert_eq!(register.key_prefix, "register");

        let refresh = RateLimit::refresh_token();
        assert_eq!(refresh.max_requests, 10);

        assert_eq!(RateLimit::password_reset().max_requests, 3);
    }

    #[test]
    fn test_fixed_window_counting() {
        let window = Duration::from_secs(60);
        let start = Instant::now();

        let first = next_count(None, start, window);
        assert_eq!(first, (1, start));

        let second = next_count(Some(first), start + Duration::from_secs(10), window);
        assert_eq!(second, (2, start));

        // 窗口结束后重新计数
        let later = start + Duration::from_secs(61);
        assert_eq!(next_count(Some(second), later, window), (1, later));
    }

    #[test]
    fn test_identifier_uses_forwarded_ip() {
        let req = actix_web::test::TestRequest::default()
            .insert_header(("X-Forwarded-For", "10.0.0.7, 10.0.0.1"))
            .to_srv_request();
        assert_eq!(limit_identifier(&req), "ip:10.0.0.7");
    }
}

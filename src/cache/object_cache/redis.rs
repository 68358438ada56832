use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// Redis 缓存后端，多个实例可通过 key_prefix 共用一个库
pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// ttl 为 0 时回退到默认值
fn effective_ttl(ttl: u64, default_ttl: u64) -> u64 {
    if ttl == 0 { default_ttl } else { ttl }
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时同步 PING 一次，失败则由启动流程回退到内存缓存
        let pong: String = client
            .get_connection()
            .and_then(|mut conn| redis::cmd("PING").query(&mut conn))
            .map_err(|e| {
                error!("Redis at {} is unreachable: {}", redis_config.url, e);
                format!("Redis ping failed: {e}")
            })?;
        debug!(
            "Redis answered {} (prefix '{}', default TTL {}s)",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        // 连接失败时无法判断令牌是否存在
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        let value: redis::RedisResult<Option<String>> =
            conn.get(prefixed_key(&self.key_prefix, key)).await;
        match value {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to read cache key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = effective_ttl(ttl, self.default_ttl);
        let result: redis::RedisResult<()> = conn
            .set_ex(prefixed_key(&self.key_prefix, &key), value, ttl)
            .await;
        match result {
            Ok(()) => debug!("Cached '{}' for {}s", key, ttl),
            Err(e) => error!("Failed to write cache key '{}': {}", key, e),
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let result: redis::RedisResult<i32> = conn.del(prefixed_key(&self.key_prefix, key)).await;
        match result {
            Ok(0) => debug!("Cache key '{}' was already gone", key),
            Ok(_) => debug!("Removed cache key '{}'", key),
            Err(e) => error!("Failed to remove cache key '{}': {}", key, e),
        }
    }

    async fn invalidate_all(&self) {
        // 共享库上不做整库清理
        warn!(
            "Redis cache does not flush keys with prefix '{}', entries expire by TTL",
            self.key_prefix
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key("journal:", "verify:abc"), "journal:verify:abc");
        assert_eq!(prefixed_key("", "user:t"), "user:t");
    }

    #[test]
    fn test_effective_ttl() {
        assert_eq!(effective_ttl(0, 3600), 3600);
        assert_eq!(effective_ttl(900, 3600), 900);
    }
}

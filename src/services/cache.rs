use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::ShippingConfig;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Two-tier cache of store shipping configuration
///
/// L1 holds decoded configs in process; L2 holds their JSON in Redis so
/// every instance sees a zone-set write after `invalidate`. Resolution
/// results are never cached, only the zones they are computed from.
pub struct ShippingCache {
    redis: Arc<Mutex<ConnectionManager>>,
    local: moka::future::Cache<String, Arc<ShippingConfig>>,
    ttl_secs: u64,
}

impl ShippingCache {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let local = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(Mutex::new(redis)),
            local,
            ttl_secs,
        })
    }

    /// Cached shipping config for a store, `None` on a miss in both tiers
    pub async fn get(&self, store_id: &str) -> Result<Option<ShippingConfig>, CacheError> {
        let key = shipping_key(store_id);

        if let Some(shipping) = self.local.get(&key).await {
            return Ok(Some(shipping.as_ref().clone()));
        }

        let json: Option<String> = {
            let mut conn = self.redis.lock().await;
            redis::cmd("GET").arg(&key).query_async(&mut *conn).await?
        };

        let Some(json) = json else {
            tracing::trace!("Shipping cache miss for store {}", store_id);
            return Ok(None);
        };

        let shipping: ShippingConfig = serde_json::from_str(&json)?;
        self.local.insert(key, Arc::new(shipping.clone())).await;

        Ok(Some(shipping))
    }

    pub async fn put(&self, store_id: &str, shipping: &ShippingConfig) -> Result<(), CacheError> {
        let key = shipping_key(store_id);
        let json = serde_json::to_string(shipping)?;

        self.local.insert(key.clone(), Arc::new(shipping.clone())).await;

        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("SETEX")
            .arg(&key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async(&mut *conn)
            .await?;

        Ok(())
    }

    /// Drop a store's config from both tiers after its zones change
    pub async fn invalidate(&self, store_id: &str) -> Result<(), CacheError> {
        let key = shipping_key(store_id);
        self.local.invalidate(&key).await;

        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("DEL").arg(&key).query_async(&mut *conn).await?;

        Ok(())
    }
}

fn shipping_key(store_id: &str) -> String {
    format!("store:shipping:{}", store_id)
}

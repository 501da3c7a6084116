//! Redis-backed [`MappingStore`].

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::Client;
use rv_domain::config::MappingStoreConfig;
use rv_domain::error::{Error, Result};

use crate::store::MappingStore;

/// Production side-mapping store backed by Redis.
///
/// The connection manager multiplexes a single connection and reconnects
/// transparently; clones share it.
#[derive(Clone)]
pub struct RedisMappingStore {
    conn: ConnectionManager,
}

impl RedisMappingStore {
    /// Connect with a bounded connect timeout and retry count.
    pub async fn connect(cfg: &MappingStoreConfig) -> Result<Self> {
        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(cfg.connect_retries)
            .set_connection_timeout(Duration::from_millis(cfg.connect_timeout_ms));

        let client = Client::open(cfg.redis_url.as_str()).map_err(to_store_err)?;
        let conn = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(to_store_err)?;

        Ok(Self { conn })
    }

    /// Round-trip a PING (used by diagnostics).
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(to_store_err)?;
        Ok(())
    }
}

#[async_trait]
impl MappingStore for RedisMappingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(to_store_err)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }
        let _: () = cmd.query_async(&mut conn).await.map_err(to_store_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: u64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(to_store_err)?;
        Ok(())
    }

    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>> {
        // Cursor-based SCAN, never the blocking KEYS command.
        let mut conn = self.conn.clone();
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(to_store_err)?;
            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }
}

fn to_store_err(e: redis::RedisError) -> Error {
    Error::MappingStore(e.to_string())
}

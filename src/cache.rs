use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Redis-backed memoization of serialized responses with a fixed TTL.
/// Entries are never invalidated explicitly; they age out.
#[derive(Clone)]
pub struct ResponseCache {
    conn: Option<ConnectionManager>,
    ttl_secs: u64,
}

impl ResponseCache {
    pub fn new(conn: ConnectionManager, ttl_secs: u64) -> Self {
        Self {
            conn: Some(conn),
            ttl_secs,
        }
    }

    /// A cache that never stores anything and never contacts redis.
    pub fn disabled() -> Self {
        Self {
            conn: None,
            ttl_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone()?;

        match conn.get::<_, Option<String>>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn put(&self, key: &str, body: &str) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, body, self.ttl_secs).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

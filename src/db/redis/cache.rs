use std::collections::hash_map::DefaultHasher;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use redis::AsyncCommands;
use redis::Client;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::Category;

/// Cache key namespace.
///
/// Generation results are keyed by category plus a digest of the normalized
/// user input and location, so the same request phrased identically hits the
/// same entry without storing raw free text in key names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Generation {
        category: Category,
        input: String,
        location: u32,
    },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Generation {
                category,
                input,
                location,
            } => {
                let mut hasher = DefaultHasher::new();
                input.trim().to_lowercase().hash(&mut hasher);
                location.hash(&mut hasher);
                write!(f, "gen:{}:{:x}", category.slug(), hasher.finish())
            }
        }
    }
}

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// The background task processes cache writes off the request path, so
    /// storing a generation never delays its response.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        let handle = CacheWriterHandle { shutdown_tx };

        (cache, handle)
    }

    /// Background task that processes cache write messages
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message to Redis
    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// Serialization happens inline; the Redis write is handed to the
    /// background worker and this returns immediately.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_key_is_stable() {
        let a = CacheKey::Generation {
            category: Category::Restaurants,
            input: "cozy italian dinner".to_string(),
            location: 10001,
        };
        let b = CacheKey::Generation {
            category: Category::Restaurants,
            input: "cozy italian dinner".to_string(),
            location: 10001,
        };
        assert_eq!(format!("{}", a), format!("{}", b));
    }

    #[test]
    fn test_generation_key_normalizes_input() {
        let a = CacheKey::Generation {
            category: Category::Movies,
            input: "  Space Opera ".to_string(),
            location: 0,
        };
        let b = CacheKey::Generation {
            category: Category::Movies,
            input: "space opera".to_string(),
            location: 0,
        };
        assert_eq!(format!("{}", a), format!("{}", b));
    }

    #[test]
    fn test_generation_key_varies_by_location() {
        let a = CacheKey::Generation {
            category: Category::Restaurants,
            input: "sushi".to_string(),
            location: 10001,
        };
        let b = CacheKey::Generation {
            category: Category::Restaurants,
            input: "sushi".to_string(),
            location: 94107,
        };
        assert_ne!(format!("{}", a), format!("{}", b));
    }

    #[test]
    fn test_generation_key_prefix_names_category() {
        let key = CacheKey::Generation {
            category: Category::WeekendTrips,
            input: "mountains".to_string(),
            location: 0,
        };
        assert!(format!("{}", key).starts_with("gen:weekend-trips:"));
    }
}

/// A macro to simplify read-through caching against Redis.
///
/// Checks the cache for `$key`; on a hit the cached value is returned as-is.
/// On a miss the block runs, its result is queued for a background cache
/// write, and the computed value is returned. A failed cache lookup is
/// logged and treated as a miss, so a Redis outage degrades to
/// cache-less operation instead of failing requests.
///
/// # Arguments
/// * `$cache`: The cache instance, providing `get_from_cache` and
///   `set_in_background`.
/// * `$key`: The key to use for caching the value.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The async block to execute if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let cached_value = cached!(cache, cache_key, 3600, async move {
///     compute_expensive_value().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::info!(key = %$key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(key = %$key, error = %e, "Cache lookup failed, computing fresh");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}

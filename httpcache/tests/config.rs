use std::sync::Arc;

use httpcache::{CacheConfig, CacheMiddleware, HttpCache};
use httpcache_memory::MemoryStore;

#[test]
fn test_cache_config_from_yaml() {
    let config: CacheConfig = serde_saphyr::from_str("spill_threshold: 1024").unwrap();
    assert_eq!(config.spill_threshold, 1024);
}

#[test]
fn test_cache_config_defaults() {
    let config: CacheConfig = serde_saphyr::from_str("{}").unwrap();
    assert_eq!(config, CacheConfig::default());
    assert_eq!(config.spill_threshold, 50 * 1024);
}

#[test]
fn test_engine_keeps_config() {
    let store = Arc::new(MemoryStore::new(1024).unwrap());
    let config = CacheConfig {
        spill_threshold: 7,
    };

    let cache = HttpCache::with_config(Arc::clone(&store), config.clone());
    assert_eq!(cache.config(), &config);
    assert!(Arc::ptr_eq(cache.store(), &store));

    let middleware = CacheMiddleware::with_config(store, config.clone());
    assert_eq!(middleware.cache().config(), &config);
}

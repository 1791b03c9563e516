//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default memory budget of a capture buffer: 50 KiB.
pub const DEFAULT_SPILL_THRESHOLD: usize = 50 * 1024;

/// Configuration of the [`HttpCache`](crate::HttpCache) engine.
///
/// ```yaml
/// spill_threshold: 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Bytes of a captured response body kept in memory before the capture
    /// moves to a temporary file.
    pub spill_threshold: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
        }
    }
}

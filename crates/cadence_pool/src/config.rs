//! Pool configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_POOL_SIZE: usize = 3;
const DEFAULT_RETURN_TIME: f32 = 10.0;

/// Configuration for a [`SimplePool`](crate::SimplePool).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial dormant-stack capacity of a pool created by a plain spawn.
    pub default_pool_size: usize,
    /// Lifetime, in seconds, of auto-return spawns that give none.
    pub default_return_time: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            default_pool_size: DEFAULT_POOL_SIZE,
            default_return_time: DEFAULT_RETURN_TIME,
        }
    }
}

//! Pool error types.

use crate::instance::InstanceId;
use crate::prefab::PrefabId;

/// Errors reported by [`SimplePool`](crate::SimplePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The prefab was never registered with this pool manager.
    #[error("unknown prefab: {0}")]
    UnknownPrefab(PrefabId),

    /// The handle does not refer to a live instance.
    #[error("instance not found: {0}")]
    InstanceNotFound(InstanceId),
}

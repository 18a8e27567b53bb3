//! Spawned instances.

use cadence_math::Transform3D;

use crate::lifetime::ReturnToPool;
use crate::prefab::PrefabId;

/// An instance managed by a [`SimplePool`](crate::SimplePool).
///
/// `T` is the game's own per-instance data. The pool only touches the
/// placement, the active flag, the container and the lifetime countdown.
#[derive(Debug)]
pub struct PooledObject<T> {
    name: String,
    pub(crate) transform: Transform3D,
    pub(crate) active: bool,
    /// Prefab whose dormant container currently holds this instance.
    pub(crate) parent: Option<PrefabId>,
    /// Pool tag: the prefab this instance was spawned from, if any.
    pub(crate) pool: Option<PrefabId>,
    pub(crate) return_to_pool: Option<ReturnToPool>,
    value: T,
}

impl<T> PooledObject<T> {
    pub(crate) fn new(name: String, value: T, transform: Transform3D, pool: Option<PrefabId>) -> Self {
        Self {
            name,
            transform,
            active: true,
            parent: None,
            pool,
            return_to_pool: None,
            value,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn transform(&self) -> &Transform3D {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform3D {
        &mut self.transform
    }

    /// `true` while in play, `false` while dormant.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Prefab this instance was spawned from, or `None` if it never came
    /// from a pool.
    #[must_use]
    pub fn pool(&self) -> Option<PrefabId> {
        self.pool
    }

    /// Prefab whose dormant container this instance is parented under.
    #[must_use]
    pub fn parent(&self) -> Option<PrefabId> {
        self.parent
    }

    #[must_use]
    pub fn return_to_pool(&self) -> Option<&ReturnToPool> {
        self.return_to_pool.as_ref()
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }
}

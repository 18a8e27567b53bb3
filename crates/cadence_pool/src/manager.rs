//! Pool manager.
//!
//! [`SimplePool`] owns every pooled instance plus one [`Pool`] per prefab.
//! Pools are created lazily on the first spawn or preload of a prefab.
//! [`SimplePool::update`] is the companion driver that counts down the
//! lifetimes of auto-return instances and despawns the expired ones.

use std::collections::HashMap;

use cadence_math::{Quat, Transform3D, Vec3};
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::instance::{InstanceId, Slots};
use crate::lifetime::ReturnToPool;
use crate::object::PooledObject;
use crate::pool::Pool;
use crate::prefab::{Prefab, PrefabId};

/// Whether a spawn should return itself to its pool after a while.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoReturn {
    /// Stay active until despawned explicitly.
    Disabled,
    /// Return after the configured default lifetime.
    #[default]
    Default,
    /// Return after this many seconds. Non-positive means the default.
    After(f32),
}

impl AutoReturn {
    /// Countdown length, or `None` when disabled.
    fn lifetime(self, default: f32) -> Option<f32> {
        match self {
            AutoReturn::Disabled => None,
            AutoReturn::After(seconds) if seconds > 0.0 => Some(seconds),
            AutoReturn::Default | AutoReturn::After(_) => Some(default),
        }
    }
}

/// What [`SimplePool::despawn`] did with an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnOutcome {
    /// Deactivated and pushed onto its pool's dormant stack.
    Pooled,
    /// Already dormant; nothing changed.
    AlreadyDormant,
    /// Not from a pool, so destroyed instead.
    Destroyed,
}

/// Pool manager for instances carrying game data of type `T`.
#[derive(Debug)]
pub struct SimplePool<T> {
    config: PoolConfig,
    prefabs: HashMap<PrefabId, Prefab<T>>,
    next_prefab: u64,
    pools: HashMap<PrefabId, Pool>,
    objects: Slots<PooledObject<T>>,
}

impl<T> SimplePool<T> {
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            prefabs: HashMap::new(),
            next_prefab: 1,
            pools: HashMap::new(),
            objects: Slots::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Register a prefab and return its identity.
    pub fn register_prefab(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> T + 'static,
    ) -> PrefabId {
        let id = PrefabId(self.next_prefab);
        self.next_prefab += 1;
        let prefab = Prefab::new(name, factory);
        debug!(prefab = %id, name = prefab.name(), "registered prefab");
        self.prefabs.insert(id, prefab);
        id
    }

    #[must_use]
    pub fn prefab(&self, id: PrefabId) -> Option<&Prefab<T>> {
        self.prefabs.get(&id)
    }

    /// The pool for `prefab`, if one has been created.
    #[must_use]
    pub fn pool(&self, prefab: PrefabId) -> Option<&Pool> {
        self.pools.get(&prefab)
    }

    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Live instances, active and dormant.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&PooledObject<T>> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut PooledObject<T>> {
        self.objects.get_mut(id)
    }

    #[must_use]
    pub fn is_alive(&self, id: InstanceId) -> bool {
        self.objects.contains(id)
    }

    #[must_use]
    pub fn is_active(&self, id: InstanceId) -> bool {
        self.objects.get(id).is_some_and(PooledObject::is_active)
    }

    /// Spawn with the default auto-return lifetime.
    pub fn spawn(
        &mut self,
        prefab: PrefabId,
        position: Vec3,
        rotation: Quat,
    ) -> Result<InstanceId, PoolError> {
        self.spawn_with(prefab, position, rotation, AutoReturn::Default)
    }

    /// Spawn an instance of `prefab` at the given placement.
    ///
    /// Reuses the most recently despawned instance if there is one, building
    /// a new one otherwise. Dormant handles whose instance was destroyed
    /// out of band are discarded and the next one is tried.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPrefab`] if `prefab` was never registered; no pool
    /// is created in that case.
    pub fn spawn_with(
        &mut self,
        prefab: PrefabId,
        position: Vec3,
        rotation: Quat,
        auto_return: AutoReturn,
    ) -> Result<InstanceId, PoolError> {
        let capacity = self.config.default_pool_size;
        self.ensure_pool(prefab, capacity)?;

        let id = loop {
            let (Some(template), Some(pool)) = (self.prefabs.get(&prefab), self.pools.get_mut(&prefab))
            else {
                return Err(PoolError::UnknownPrefab(prefab));
            };
            match pool.pop() {
                Some(id) if self.objects.contains(id) => break id,
                Some(stale) => {
                    debug!(prefab = %prefab, instance = %stale, "dormant instance was destroyed; trying next");
                }
                None => {
                    let name = pool.next_name(template.name());
                    let transform = Transform3D::from_position_rotation(position, rotation);
                    let object = PooledObject::new(name, template.instantiate(), transform, Some(prefab));
                    break self.objects.insert(object);
                }
            }
        };

        let default_lifetime = self.config.default_return_time;
        let object = self
            .objects
            .get_mut(id)
            .ok_or(PoolError::InstanceNotFound(id))?;
        if let Some(lifetime) = auto_return.lifetime(default_lifetime) {
            object
                .return_to_pool
                .get_or_insert_with(ReturnToPool::default)
                .start_timer(lifetime);
        }
        object.transform.set_position_rotation(position, rotation);
        object.active = true;
        Ok(id)
    }

    /// Return an instance to its pool.
    ///
    /// Stops its lifetime countdown, deactivates it, parents it under the
    /// pool's container and pushes it onto the dormant stack. An instance
    /// that did not come from a pool is destroyed instead.
    ///
    /// # Errors
    ///
    /// [`PoolError::InstanceNotFound`] if `id` is stale.
    pub fn despawn(&mut self, id: InstanceId) -> Result<DespawnOutcome, PoolError> {
        let object = self
            .objects
            .get_mut(id)
            .ok_or(PoolError::InstanceNotFound(id))?;

        let Some(prefab) = object.pool else {
            info!(instance = %id, name = object.name(), "not spawned from a pool; destroying it instead");
            self.objects.remove(id);
            return Ok(DespawnOutcome::Destroyed);
        };
        if !object.active {
            debug!(instance = %id, "already dormant");
            return Ok(DespawnOutcome::AlreadyDormant);
        }

        if let Some(timer) = object.return_to_pool.as_mut() {
            timer.stop_timer();
        }
        object.active = false;

        let Some(pool) = self.pools.get_mut(&prefab) else {
            warn!(instance = %id, prefab = %prefab, "pool no longer exists; destroying instance");
            self.objects.remove(id);
            return Ok(DespawnOutcome::Destroyed);
        };
        debug_assert!(!pool.contains(id));
        object.parent = Some(prefab);
        pool.push(id);
        Ok(DespawnOutcome::Pooled)
    }

    /// Seed the dormant stack of `prefab` with `qty` instances.
    ///
    /// # Errors
    ///
    /// [`PoolError::UnknownPrefab`] if `prefab` was never registered.
    pub fn preload(&mut self, prefab: PrefabId, qty: usize) -> Result<(), PoolError> {
        self.ensure_pool(prefab, qty)?;

        let mut spawned = Vec::with_capacity(qty);
        for _ in 0..qty {
            spawned.push(self.spawn(prefab, Vec3::ZERO, Quat::IDENTITY)?);
        }
        for id in spawned {
            self.despawn(id)?;
        }
        debug!(prefab = %prefab, qty, "preloaded pool");
        Ok(())
    }

    /// Add an instance that is not tied to any pool. Despawning it destroys
    /// it.
    pub fn insert(&mut self, name: impl Into<String>, value: T, transform: Transform3D) -> InstanceId {
        self.objects
            .insert(PooledObject::new(name.into(), value, transform, None))
    }

    /// Destroy an instance outright, bypassing its pool.
    ///
    /// Any dormant-stack handle to it goes stale and is skipped by the next
    /// spawn. Returns the instance data, or `None` if `id` was stale.
    pub fn destroy(&mut self, id: InstanceId) -> Option<T> {
        let object = self.objects.remove(id)?;
        debug!(instance = %id, name = object.name(), "destroyed instance");
        Some(object.into_value())
    }

    /// Count down lifetimes of active instances by `delta` seconds and
    /// despawn the ones that ran out. Returns how many were despawned.
    pub fn update(&mut self, delta: f32) -> usize {
        let expired: Vec<InstanceId> = self
            .objects
            .iter_mut()
            .filter(|(_, object)| object.active)
            .filter_map(|(id, object)| {
                let timer = object.return_to_pool.as_mut()?;
                timer.advance(delta).then_some(id)
            })
            .collect();

        let mut returned = 0;
        for id in expired {
            if let Ok(DespawnOutcome::Pooled) = self.despawn(id) {
                returned += 1;
            }
        }
        if returned > 0 {
            debug!(returned, "lifetimes expired");
        }
        returned
    }

    /// Destroy every instance and drop every pool. Registered prefabs stay.
    ///
    /// The re-initialisation point for a scene reload: nothing spawned before
    /// survives, and handles to it go stale.
    pub fn clear(&mut self) {
        let instances = self.objects.len();
        let pools = self.pools.len();
        self.objects.clear();
        self.pools.clear();
        info!(instances, pools, "cleared all pools");
    }

    fn ensure_pool(&mut self, prefab: PrefabId, capacity: usize) -> Result<(), PoolError> {
        let Some(template) = self.prefabs.get(&prefab) else {
            warn!(prefab = %prefab, "spawn from an unknown prefab");
            return Err(PoolError::UnknownPrefab(prefab));
        };
        if !self.pools.contains_key(&prefab) {
            let pool = Pool::new(prefab, template.name(), capacity);
            debug!(prefab = %prefab, container = pool.container(), "created pool");
            self.pools.insert(prefab, pool);
        }
        Ok(())
    }
}

impl<T> Default for SimplePool<T> {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

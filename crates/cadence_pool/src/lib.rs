//! # cadence_pool
//!
//! Object pooling keyed by prefab. Spawning pops the most recently returned
//! dormant instance of that prefab (or builds a new one); despawning pushes it
//! back. Instances can return themselves after a lifetime, counted down by
//! [`SimplePool::update`].
//!
//! This crate provides:
//!
//! - [`SimplePool`]: the pool manager (spawn, despawn, preload, update).
//! - [`PrefabId`] / [`Prefab`]: template identity and factory.
//! - [`InstanceId`]: generational handle; stale handles are detected.
//! - [`PooledObject`]: an instance with placement, active flag and pool tag.
//! - [`ReturnToPool`]: the lifetime countdown attached to auto-return spawns.
//!
//! The pool does not reset instance state on reuse. Whatever the instance
//! changed while active is still there on the next spawn; callers reset it.

pub mod config;
pub mod error;
pub mod instance;
pub mod lifetime;
pub mod manager;
pub mod object;
pub mod pool;
pub mod prefab;

pub use config::PoolConfig;
pub use error::PoolError;
pub use instance::InstanceId;
pub use lifetime::ReturnToPool;
pub use manager::{AutoReturn, DespawnOutcome, SimplePool};
pub use object::PooledObject;
pub use pool::Pool;
pub use prefab::{Prefab, PrefabId};

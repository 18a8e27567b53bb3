//! Prefab identity and factories.
//!
//! A [`PrefabId`] is the key pools are stored under. Two prefabs built from
//! identical factories are still different prefabs: identity, not value.

use std::fmt;

/// Identity of a registered prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefabId(pub u64);

impl fmt::Display for PrefabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefab({})", self.0)
    }
}

/// A named template that builds fresh instance values.
pub struct Prefab<T> {
    name: String,
    factory: Box<dyn Fn() -> T>,
}

impl<T> Prefab<T> {
    #[must_use]
    pub fn new(name: impl Into<String>, factory: impl Fn() -> T + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a new instance value.
    #[must_use]
    pub fn instantiate(&self) -> T {
        (self.factory)()
    }
}

impl<T> fmt::Debug for Prefab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefab").field("name", &self.name).finish()
    }
}

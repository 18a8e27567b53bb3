//! The pool for a single prefab.

use crate::instance::InstanceId;
use crate::prefab::PrefabId;

/// Dormant instances of one prefab, reused last-in first-out.
#[derive(Debug)]
pub struct Pool {
    prefab: PrefabId,
    container: String,
    /// Appended to the name of every new instance.
    next_id: u64,
    inactive: Vec<InstanceId>,
}

impl Pool {
    pub(crate) fn new(prefab: PrefabId, prefab_name: &str, capacity: usize) -> Self {
        Self {
            prefab,
            container: format!("{prefab_name}_pool"),
            next_id: 1,
            inactive: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn prefab(&self) -> PrefabId {
        self.prefab
    }

    /// Name of the container dormant instances are parented under.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Number of dormant handles, including any that went stale.
    #[must_use]
    pub fn dormant(&self) -> usize {
        self.inactive.len()
    }

    pub(crate) fn contains(&self, id: InstanceId) -> bool {
        self.inactive.contains(&id)
    }

    pub(crate) fn pop(&mut self) -> Option<InstanceId> {
        self.inactive.pop()
    }

    pub(crate) fn push(&mut self, id: InstanceId) {
        self.inactive.push(id);
    }

    /// Name for the next freshly built instance: `"<prefab> (<n>)"`.
    pub(crate) fn next_name(&mut self, prefab_name: &str) -> String {
        let name = format!("{prefab_name} ({})", self.next_id);
        self.next_id += 1;
        name
    }
}

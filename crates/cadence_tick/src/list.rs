//! Ordered ticker storage for one variant.
//!
//! Entries sit in a `Vec` in registration order so the driver can walk them
//! by index from the back. A key set answers membership in O(1).

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Weak;

use crate::ticker::TickerKey;

/// Snapshot of one ticker's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStatus {
    /// Interval between fires, fixed at registration.
    pub interval: f32,
    /// Time accumulated since the last fire.
    pub accumulated: f32,
}

pub(crate) struct TickEntry<T: ?Sized> {
    pub(crate) key: TickerKey,
    pub(crate) owner: Weak<RefCell<T>>,
    pub(crate) interval: f32,
    pub(crate) accumulated: f32,
    /// Rust type name of the owner, for diagnostics.
    pub(crate) type_name: &'static str,
}

impl<T: ?Sized> TickEntry<T> {
    pub(crate) fn new(
        key: TickerKey,
        owner: Weak<RefCell<T>>,
        interval: f32,
        type_name: &'static str,
    ) -> Self {
        Self {
            key,
            owner,
            interval,
            accumulated: 0.0,
            type_name,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }

    pub(crate) fn status(&self) -> TickStatus {
        TickStatus {
            interval: self.interval,
            accumulated: self.accumulated,
        }
    }
}

impl<T: ?Sized> fmt::Debug for TickEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickEntry")
            .field("key", &self.key)
            .field("ticker", &self.type_name)
            .field("interval", &self.interval)
            .field("accumulated", &self.accumulated)
            .finish()
    }
}

pub(crate) struct TickList<T: ?Sized> {
    entries: Vec<TickEntry<T>>,
    keys: HashSet<TickerKey>,
}

impl<T: ?Sized> TickList<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            keys: HashSet::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains(&self, key: TickerKey) -> bool {
        self.keys.contains(&key)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&TickEntry<T>> {
        self.entries.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut TickEntry<T>> {
        self.entries.get_mut(index)
    }

    /// Keys in reverse registration order.
    pub(crate) fn keys_rev(&self) -> Vec<TickerKey> {
        self.entries.iter().rev().map(|entry| entry.key).collect()
    }

    /// Owners in reverse registration order.
    pub(crate) fn owners_rev(&self) -> Vec<Weak<RefCell<T>>> {
        self.entries
            .iter()
            .rev()
            .map(|entry| Weak::clone(&entry.owner))
            .collect()
    }

    pub(crate) fn position(&self, key: TickerKey) -> Option<usize> {
        if !self.contains(key) {
            return None;
        }
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub(crate) fn status(&self, key: TickerKey) -> Option<TickStatus> {
        if !self.contains(key) {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(TickEntry::status)
    }

    /// Append `entry` unless a live ticker with the same key is present.
    ///
    /// A dead entry under the same key (its owner dropped and the address
    /// reused) is replaced. Returns `true` if `entry` was added.
    pub(crate) fn insert(&mut self, entry: TickEntry<T>) -> bool {
        if self.keys.contains(&entry.key) {
            let live = self
                .entries
                .iter()
                .any(|existing| existing.key == entry.key && existing.is_alive());
            if live {
                return false;
            }
            self.remove(entry.key);
        }
        self.keys.insert(entry.key);
        self.entries.push(entry);
        true
    }

    /// Remove the entry for `key`, keeping the order of the rest.
    pub(crate) fn remove(&mut self, key: TickerKey) -> bool {
        if !self.keys.remove(&key) {
            return false;
        }
        if let Some(pos) = self.entries.iter().position(|entry| entry.key == key) {
            self.entries.remove(pos);
        }
        true
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
    }
}

impl<T: ?Sized> fmt::Debug for TickList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn entry(owner: &Rc<RefCell<u32>>, interval: f32) -> TickEntry<u32> {
        TickEntry::new(
            TickerKey::of_cell(owner),
            Rc::downgrade(owner),
            interval,
            "u32",
        )
    }

    #[test]
    fn test_insert_is_idempotent_for_live_owner() {
        let owner = Rc::new(RefCell::new(0));
        let mut list = TickList::new();
        assert!(list.insert(entry(&owner, 1.0)));
        assert!(!list.insert(entry(&owner, 5.0)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.status(TickerKey::of_cell(&owner)).unwrap().interval, 1.0);
    }

    #[test]
    fn test_remove_keeps_order() {
        let a = Rc::new(RefCell::new(0));
        let b = Rc::new(RefCell::new(1));
        let c = Rc::new(RefCell::new(2));
        let mut list = TickList::new();
        list.insert(entry(&a, 1.0));
        list.insert(entry(&b, 2.0));
        list.insert(entry(&c, 3.0));

        assert!(list.remove(TickerKey::of_cell(&b)));
        assert!(!list.remove(TickerKey::of_cell(&b)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().interval, 1.0);
        assert_eq!(list.get(1).unwrap().interval, 3.0);
    }

    #[test]
    fn test_dead_entry_is_replaced() {
        let owner = Rc::new(RefCell::new(0));
        let key = TickerKey::of_cell(&owner);
        let mut list = TickList::new();
        list.insert(entry(&owner, 1.0));

        // Simulate an address reused after the first owner was dropped.
        let dead: Weak<RefCell<u32>> = Weak::new();
        list.entries[0].owner = dead;
        assert!(list.insert(entry(&owner, 2.0)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.status(key).unwrap().interval, 2.0);
    }

    #[test]
    fn test_snapshots_are_newest_first() {
        let a = Rc::new(RefCell::new(1));
        let b = Rc::new(RefCell::new(2));
        let mut list = TickList::new();
        list.insert(entry(&a, 1.0));
        list.insert(entry(&b, 1.0));

        assert_eq!(
            list.keys_rev(),
            vec![TickerKey::of_cell(&b), TickerKey::of_cell(&a)]
        );
        let owners: Vec<u32> = list
            .owners_rev()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|owner| *owner.borrow())
            .collect();
        assert_eq!(owners, vec![2, 1]);
    }

    #[test]
    fn test_clear() {
        let owner = Rc::new(RefCell::new(0));
        let mut list = TickList::new();
        list.insert(entry(&owner, 1.0));
        list.clear();
        assert!(list.is_empty());
        assert!(!list.contains(TickerKey::of_cell(&owner)));
    }
}

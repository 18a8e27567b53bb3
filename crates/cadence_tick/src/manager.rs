//! Ticker registry.
//!
//! [`TickManager`] maps every registered ticker to its bookkeeping (interval
//! and accumulated time) in one ordered list per [`Variant`]. Registration and
//! removal are idempotent; [`TickManager::clear`] lets every ticker release
//! itself before the lists are emptied.
//!
//! The registry is an ordinary value. The host creates one at startup and
//! passes it by `&mut` to whatever needs to register; there is no global.

use std::any::type_name;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::config::TickConfig;
use crate::list::{TickEntry, TickList, TickStatus};
use crate::runner::{RunnerState, TickRunner};
use crate::ticker::{PhysicsTick, ScaledTick, TickerKey, UnscaledTick};
use crate::variant::{Physics, Scaled, TickVariant, Unscaled, Variant};

/// Registry of scaled, unscaled and physics tickers.
#[derive(Debug)]
pub struct TickManager {
    pub(crate) scaled: TickList<dyn ScaledTick>,
    pub(crate) unscaled: TickList<dyn UnscaledTick>,
    pub(crate) physics: TickList<dyn PhysicsTick>,
    /// While set, sweeps neither advance nor fire anything.
    frozen: bool,
    /// Created on first registration.
    pub(crate) runner: Option<TickRunner>,
    pub(crate) config: TickConfig,
}

impl TickManager {
    /// Create an empty registry. No runner exists until the first ticker
    /// registers.
    #[must_use]
    pub fn new(config: TickConfig) -> Self {
        Self {
            scaled: TickList::new(),
            unscaled: TickList::new(),
            physics: TickList::new(),
            frozen: false,
            runner: None,
            config,
        }
    }

    /// Returns the registry configuration.
    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Register a scaled ticker. No-op if it is already registered.
    ///
    /// Returns `true` if the ticker was added.
    pub fn add_ticker<T: ScaledTick + 'static>(&mut self, ticker: &Rc<RefCell<T>>) -> bool {
        let Some(interval) = read_interval(ticker, |t| t.tick_duration()) else {
            return false;
        };
        let weak = Rc::downgrade(ticker);
        let owner: Weak<RefCell<dyn ScaledTick>> = weak;
        self.register::<Scaled>(
            TickerKey::of_cell(ticker),
            owner,
            interval,
            type_name::<T>(),
        )
    }

    /// Register an unscaled ticker. No-op if it is already registered.
    pub fn add_unscaled_ticker<T: UnscaledTick + 'static>(
        &mut self,
        ticker: &Rc<RefCell<T>>,
    ) -> bool {
        let Some(interval) = read_interval(ticker, |t| t.unscaled_tick_duration()) else {
            return false;
        };
        let weak = Rc::downgrade(ticker);
        let owner: Weak<RefCell<dyn UnscaledTick>> = weak;
        self.register::<Unscaled>(
            TickerKey::of_cell(ticker),
            owner,
            interval,
            type_name::<T>(),
        )
    }

    /// Register a physics ticker. No-op if it is already registered.
    pub fn add_physics_ticker<T: PhysicsTick + 'static>(
        &mut self,
        ticker: &Rc<RefCell<T>>,
    ) -> bool {
        let Some(interval) = read_interval(ticker, |t| t.physics_tick_duration()) else {
            return false;
        };
        let weak = Rc::downgrade(ticker);
        let owner: Weak<RefCell<dyn PhysicsTick>> = weak;
        self.register::<Physics>(
            TickerKey::of_cell(ticker),
            owner,
            interval,
            type_name::<T>(),
        )
    }

    /// Remove a scaled ticker. No-op if it is not registered.
    ///
    /// Takes a plain reference so a ticker can remove itself from inside its
    /// own callbacks. Returns `true` if an entry was removed.
    pub fn remove_ticker<T: ScaledTick + ?Sized>(&mut self, ticker: &T) -> bool {
        self.unregister::<Scaled>(TickerKey::of(ticker))
    }

    /// Remove an unscaled ticker. No-op if it is not registered.
    pub fn remove_unscaled_ticker<T: UnscaledTick + ?Sized>(&mut self, ticker: &T) -> bool {
        self.unregister::<Unscaled>(TickerKey::of(ticker))
    }

    /// Remove a physics ticker. No-op if it is not registered.
    pub fn remove_physics_ticker<T: PhysicsTick + ?Sized>(&mut self, ticker: &T) -> bool {
        self.unregister::<Physics>(TickerKey::of(ticker))
    }

    /// Returns `true` if `key` is registered for `variant`.
    #[must_use]
    pub fn contains(&self, variant: Variant, key: TickerKey) -> bool {
        match variant {
            Variant::Scaled => self.scaled.contains(key),
            Variant::Unscaled => self.unscaled.contains(key),
            Variant::Physics => self.physics.contains(key),
        }
    }

    /// Bookkeeping for `key` under `variant`, if registered.
    #[must_use]
    pub fn status(&self, variant: Variant, key: TickerKey) -> Option<TickStatus> {
        match variant {
            Variant::Scaled => self.scaled.status(key),
            Variant::Unscaled => self.unscaled.status(key),
            Variant::Physics => self.physics.status(key),
        }
    }

    /// Number of tickers registered for `variant`.
    #[must_use]
    pub fn len(&self, variant: Variant) -> usize {
        match variant {
            Variant::Scaled => self.scaled.len(),
            Variant::Unscaled => self.unscaled.len(),
            Variant::Physics => self.physics.len(),
        }
    }

    /// Returns `true` if no ticker of any variant is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scaled.is_empty() && self.unscaled.is_empty() && self.physics.is_empty()
    }

    /// Returns `true` while ticking is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze or resume all ticking without touching registrations.
    pub fn freeze_ticks(&mut self, frozen: bool) {
        if self.frozen != frozen {
            debug!(frozen, "tick freeze changed");
        }
        self.frozen = frozen;
    }

    /// State of the runner, or `None` before the first registration.
    #[must_use]
    pub fn runner_state(&self) -> Option<RunnerState> {
        self.runner.as_ref().map(TickRunner::state)
    }

    /// Ask every registered ticker to remove itself, then empty all lists.
    ///
    /// Each entry's remove callback runs once, unscaled first, then scaled,
    /// then physics, walking each list from the back. The owners are the ones
    /// registered when the call began: a callback that removes other entries
    /// does not stop those owners from being released.
    pub fn clear(&mut self) {
        let count = self.scaled.len() + self.unscaled.len() + self.physics.len();

        self.release_all::<Unscaled>();
        self.release_all::<Scaled>();
        self.release_all::<Physics>();

        self.unscaled.clear();
        self.scaled.clear();
        self.physics.clear();

        debug!(count, "cleared tick registry");
    }

    /// Drop every entry without callbacks, unfreeze, and discard the runner.
    ///
    /// This is the re-initialisation point after a scene or subsystem reload:
    /// nothing registered before the reset survives it.
    pub fn reset(&mut self) {
        self.scaled.clear();
        self.unscaled.clear();
        self.physics.clear();
        self.frozen = false;
        self.runner = None;
        info!("tick registry reset");
    }

    fn register<V: TickVariant>(
        &mut self,
        key: TickerKey,
        owner: Weak<RefCell<V::Ticker>>,
        interval: f32,
        type_name: &'static str,
    ) -> bool {
        let entry = TickEntry::new(key, owner, interval, type_name);
        if !V::list_mut(self).insert(entry) {
            return false;
        }
        debug!(variant = %V::VARIANT, ticker = type_name, interval, "registered ticker");
        self.ensure_runner();
        true
    }

    fn unregister<V: TickVariant>(&mut self, key: TickerKey) -> bool {
        let removed = V::list_mut(self).remove(key);
        if removed {
            debug!(variant = %V::VARIANT, "removed ticker");
        }
        removed
    }

    fn release_all<V: TickVariant>(&mut self) {
        // Owners are captured up front so a release that removes other
        // entries cannot cause those owners to be skipped.
        let owners = V::list(self).owners_rev();
        for owner in owners {
            let Some(owner) = owner.upgrade() else {
                continue;
            };
            match owner.try_borrow_mut() {
                Ok(mut ticker) => V::release(&mut *ticker, self),
                Err(_) => debug!(
                    variant = %V::VARIANT,
                    "ticker busy during clear; dropped without release"
                ),
            }
        }
    }

    fn ensure_runner(&mut self) {
        match &self.runner {
            None => {
                self.runner = Some(TickRunner::new());
                debug!("created tick runner");
            }
            Some(runner) if runner.state() == RunnerState::Destroyed => {
                debug!("tick runner destroyed; tickers will not fire until reset");
            }
            Some(_) => {}
        }
    }
}

impl Default for TickManager {
    fn default() -> Self {
        Self::new(TickConfig::default())
    }
}

fn read_interval<T>(ticker: &RefCell<T>, interval: impl FnOnce(&T) -> f32) -> Option<f32> {
    match ticker.try_borrow() {
        Ok(owner) => Some(interval(&owner)),
        Err(_) => {
            warn!(
                ticker = type_name::<T>(),
                "ticker is mutably borrowed; not registered"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FrameTime;
    use crate::testing::{Recorder, approx_eq};

    #[test]
    fn test_register_creates_entry_and_runner() {
        let mut ticks = TickManager::default();
        assert_eq!(ticks.runner_state(), None);

        let rec = Recorder::shared(1.0);
        assert!(Recorder::add_ticker(&rec, &mut ticks));
        assert_eq!(ticks.len(Variant::Scaled), 1);
        assert_eq!(ticks.runner_state(), Some(RunnerState::Uninitialized));

        let status = ticks.status(Variant::Scaled, TickerKey::of_cell(&rec)).unwrap();
        assert_eq!(status.interval, 1.0);
        assert_eq!(status.accumulated, 0.0);
    }

    #[test]
    fn test_double_register_is_noop() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        assert!(ticks.add_ticker(&rec));

        rec.borrow_mut().interval = 9.0;
        assert!(!ticks.add_ticker(&rec));

        assert_eq!(ticks.len(Variant::Scaled), 1);
        let status = ticks.status(Variant::Scaled, TickerKey::of_cell(&rec)).unwrap();
        assert_eq!(status.interval, 1.0);
    }

    #[test]
    fn test_double_register_keeps_accumulated_time() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        assert!(ticks.add_ticker(&rec));
        ticks.start();
        ticks.update(FrameTime::unscaled(0.4));

        rec.borrow_mut().interval = 9.0;
        assert!(!ticks.add_ticker(&rec));

        let status = ticks.status(Variant::Scaled, TickerKey::of_cell(&rec)).unwrap();
        assert!(approx_eq(status.accumulated, 0.4));
        assert_eq!(status.interval, 1.0);
        assert_eq!(rec.borrow().fired, 0);
    }

    #[test]
    fn test_variants_are_independent() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(0.5);
        ticks.add_ticker(&rec);
        ticks.add_unscaled_ticker(&rec);
        ticks.add_physics_ticker(&rec);
        assert_eq!(ticks.len(Variant::Scaled), 1);
        assert_eq!(ticks.len(Variant::Unscaled), 1);
        assert_eq!(ticks.len(Variant::Physics), 1);

        assert!(ticks.remove_unscaled_ticker(&*rec.borrow()));
        assert!(ticks.contains(Variant::Scaled, TickerKey::of_cell(&rec)));
        assert!(!ticks.contains(Variant::Unscaled, TickerKey::of_cell(&rec)));
        assert!(ticks.contains(Variant::Physics, TickerKey::of_cell(&rec)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        ticks.add_ticker(&rec);
        assert!(ticks.remove_ticker(&*rec.borrow()));
        assert!(!ticks.remove_ticker(&*rec.borrow()));
        assert!(ticks.is_empty());
    }

    #[test]
    fn test_register_remove_sequences_keep_at_most_one_entry() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        let ops = [true, true, false, true, false, false, true, true, true, false, true];
        for add in ops {
            if add {
                ticks.add_physics_ticker(&rec);
            } else {
                ticks.remove_physics_ticker(&*rec.borrow());
            }
            assert!(ticks.len(Variant::Physics) <= 1);
        }
        assert_eq!(ticks.len(Variant::Physics), 1);
    }

    #[test]
    fn test_register_while_borrowed_is_refused() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        let _guard = rec.borrow_mut();
        assert!(!ticks.add_ticker(&rec));
        assert!(ticks.is_empty());
    }

    #[test]
    fn test_clear_calls_remove_once_per_entry() {
        let mut ticks = TickManager::default();
        let a = Recorder::shared(1.0);
        let b = Recorder::shared(1.0);
        ticks.add_ticker(&a);
        ticks.add_ticker(&b);
        ticks.add_unscaled_ticker(&a);
        ticks.add_physics_ticker(&b);

        ticks.clear();

        assert!(ticks.is_empty());
        assert_eq!(a.borrow().removed, 1);
        assert_eq!(a.borrow().unscaled_removed, 1);
        assert_eq!(b.borrow().removed, 1);
        assert_eq!(b.borrow().physics_removed, 1);
    }

    #[test]
    fn test_clear_survives_removal_of_other_entries() {
        let mut ticks = TickManager::default();
        let first = Recorder::shared(1.0);
        let second = Recorder::shared(1.0);
        let third = Recorder::shared(1.0);
        ticks.add_ticker(&first);
        ticks.add_ticker(&second);
        ticks.add_ticker(&third);

        // The last entry takes the first two down with it; both still get
        // their own release.
        third.borrow_mut().also_remove = vec![first.clone(), second.clone()];

        ticks.clear();

        assert!(ticks.is_empty());
        assert_eq!(third.borrow().removed, 1);
        assert_eq!(first.borrow().removed, 1);
        assert_eq!(second.borrow().removed, 1);
    }

    #[test]
    fn test_clear_releases_each_entry_once_when_others_shift() {
        let mut ticks = TickManager::default();
        let first = Recorder::shared(1.0);
        let second = Recorder::shared(1.0);
        let third = Recorder::shared(1.0);
        ticks.add_ticker(&first);
        ticks.add_ticker(&second);
        ticks.add_ticker(&third);

        // Stays registered but removes the entry below it.
        third.borrow_mut().keep_on_remove = true;
        third.borrow_mut().also_remove = vec![second.clone()];

        ticks.clear();

        assert!(ticks.is_empty());
        assert_eq!(third.borrow().removed, 1);
        assert_eq!(second.borrow().removed, 1);
        assert_eq!(first.borrow().removed, 1);
    }

    #[test]
    fn test_clear_when_owner_does_not_deregister() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        rec.borrow_mut().keep_on_remove = true;
        ticks.add_ticker(&rec);

        ticks.clear();

        assert_eq!(rec.borrow().removed, 1);
        assert!(ticks.is_empty());
    }

    #[test]
    fn test_freeze_flag() {
        let mut ticks = TickManager::default();
        assert!(!ticks.is_frozen());
        ticks.freeze_ticks(true);
        assert!(ticks.is_frozen());
        ticks.freeze_ticks(false);
        assert!(!ticks.is_frozen());
    }

    #[test]
    fn test_reset_drops_entries_without_callbacks() {
        let mut ticks = TickManager::default();
        let rec = Recorder::shared(1.0);
        ticks.add_ticker(&rec);
        ticks.freeze_ticks(true);

        ticks.reset();

        assert!(ticks.is_empty());
        assert!(!ticks.is_frozen());
        assert_eq!(ticks.runner_state(), None);
        assert_eq!(rec.borrow().removed, 0);
    }
}

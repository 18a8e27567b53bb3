//! Ticker capability traits.
//!
//! A ticker is any object that wants a callback once every fixed interval,
//! independent of the host frame rate. There is one trait per time source:
//!
//! - [`ScaledTick`]: advanced by the scaled frame delta (slows down and stops
//!   with the time scale).
//! - [`UnscaledTick`]: advanced by the real frame delta.
//! - [`PhysicsTick`]: advanced by the fixed physics step.
//!
//! A type may implement any combination. Each trait carries the same four
//! capabilities: add self, remove self, fire, and report its interval. Method
//! names differ per trait so one type can implement all three without
//! ambiguity.
//!
//! The registry never owns a ticker. Tickers live in `Rc<RefCell<_>>` owned by
//! the game code and the registry keeps a `Weak` to each.

use std::cell::RefCell;
use std::rc::Rc;

use crate::manager::TickManager;

/// Identity of a registered ticker: the address of the ticker value.
///
/// The same key is produced from the `RefCell` the ticker lives in and from a
/// plain reference to the ticker, so an owner can deregister itself from
/// inside its own callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickerKey(usize);

impl TickerKey {
    /// Key of the ticker behind `owner`.
    #[must_use]
    pub fn of<T: ?Sized>(owner: &T) -> Self {
        Self(std::ptr::from_ref(owner).cast::<()>() as usize)
    }

    /// Key of the ticker stored inside `cell`, without borrowing it.
    #[must_use]
    pub fn of_cell<T: ?Sized>(cell: &RefCell<T>) -> Self {
        Self(cell.as_ptr().cast::<()>() as usize)
    }
}

/// Handed to a ticker when it fires.
///
/// Gives the ticker mutable access to the registry, so it can add or remove
/// tickers (itself included) in the middle of a sweep.
#[derive(Debug)]
pub struct TickContext<'a> {
    ticks: &'a mut TickManager,
    elapsed: f32,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(ticks: &'a mut TickManager, elapsed: f32) -> Self {
        Self { ticks, elapsed }
    }

    /// Time accumulated since the previous fire, in seconds.
    ///
    /// At least the ticker's interval; larger when a frame overshot it.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The registry driving this sweep.
    pub fn ticks(&mut self) -> &mut TickManager {
        self.ticks
    }
}

/// A ticker advanced by scaled frame time.
pub trait ScaledTick {
    /// Fire. Called once the accumulated scaled time reaches the interval.
    fn tick(&mut self, ctx: &mut TickContext<'_>);

    /// Interval between fires, in seconds. Read once at registration.
    fn tick_duration(&self) -> f32;

    /// Register `this` with the registry. Returns `true` if newly added.
    fn add_ticker(this: &Rc<RefCell<Self>>, ticks: &mut TickManager) -> bool
    where
        Self: Sized + 'static,
    {
        ticks.add_ticker(this)
    }

    /// Leave the registry. [`TickManager::clear`] calls this for every
    /// registered ticker, so overrides can release other resources first.
    fn remove_ticker(&mut self, ticks: &mut TickManager) {
        ticks.remove_ticker(self);
    }
}

/// A ticker advanced by unscaled (real) frame time.
pub trait UnscaledTick {
    /// Fire. Called once the accumulated unscaled time reaches the interval.
    fn unscaled_tick(&mut self, ctx: &mut TickContext<'_>);

    /// Interval between fires, in seconds. Read once at registration.
    fn unscaled_tick_duration(&self) -> f32;

    /// Register `this` with the registry. Returns `true` if newly added.
    fn add_unscaled_ticker(this: &Rc<RefCell<Self>>, ticks: &mut TickManager) -> bool
    where
        Self: Sized + 'static,
    {
        ticks.add_unscaled_ticker(this)
    }

    /// Leave the registry. See [`ScaledTick::remove_ticker`].
    fn remove_unscaled_ticker(&mut self, ticks: &mut TickManager) {
        ticks.remove_unscaled_ticker(self);
    }
}

/// A ticker advanced by the fixed physics step.
pub trait PhysicsTick {
    /// Fire. Called once the accumulated physics time reaches the interval.
    fn physics_tick(&mut self, ctx: &mut TickContext<'_>);

    /// Interval between fires, in seconds. Read once at registration.
    fn physics_tick_duration(&self) -> f32;

    /// Register `this` with the registry. Returns `true` if newly added.
    fn add_physics_ticker(this: &Rc<RefCell<Self>>, ticks: &mut TickManager) -> bool
    where
        Self: Sized + 'static,
    {
        ticks.add_physics_ticker(this)
    }

    /// Leave the registry. See [`ScaledTick::remove_ticker`].
    fn remove_physics_ticker(&mut self, ticks: &mut TickManager) {
        ticks.remove_physics_ticker(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        _hp: u32,
    }

    #[test]
    fn test_key_matches_between_cell_and_reference() {
        let cell = RefCell::new(Probe { _hp: 10 });
        let from_cell = TickerKey::of_cell(&cell);
        let from_ref = TickerKey::of(&*cell.borrow());
        assert_eq!(from_cell, from_ref);
    }

    #[test]
    fn test_key_matches_through_trait_object() {
        let rc = Rc::new(RefCell::new(Probe { _hp: 1 }));
        let erased: Rc<RefCell<dyn std::any::Any>> = rc.clone();
        assert_eq!(TickerKey::of_cell(&rc), TickerKey::of_cell(&erased));
    }

    #[test]
    fn test_distinct_tickers_have_distinct_keys() {
        let a = Rc::new(RefCell::new(Probe { _hp: 1 }));
        let b = Rc::new(RefCell::new(Probe { _hp: 1 }));
        assert_ne!(TickerKey::of_cell(&a), TickerKey::of_cell(&b));
    }
}

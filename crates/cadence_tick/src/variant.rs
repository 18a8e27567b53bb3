//! Tick variants and their overflow policies.
//!
//! The three ticker kinds share one list type and one sweep. What differs per
//! variant is which list it lives in, which trait method fires it, and what
//! happens to the accumulator when it fires ([`Overflow`]).

use std::fmt;

use crate::list::TickList;
use crate::manager::TickManager;
use crate::ticker::{PhysicsTick, ScaledTick, TickContext, UnscaledTick};

/// The time source driving a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Scaled frame time.
    Scaled,
    /// Real frame time.
    Unscaled,
    /// Fixed physics step.
    Physics,
}

impl Variant {
    /// All variants, in the order [`TickManager::clear`] releases them.
    pub const ALL: [Variant; 3] = [Variant::Unscaled, Variant::Scaled, Variant::Physics];

    /// What the accumulator does when a ticker of this variant fires.
    #[must_use]
    pub const fn overflow(self) -> Overflow {
        match self {
            Variant::Scaled => Overflow::Carry,
            Variant::Unscaled | Variant::Physics => Overflow::Reset,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Scaled => write!(f, "scaled"),
            Variant::Unscaled => write!(f, "unscaled"),
            Variant::Physics => write!(f, "physics"),
        }
    }
}

/// Accumulator handling on fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Drop any overshoot: the accumulator restarts at zero.
    Reset,
    /// Keep the overshoot: the interval is subtracted from the accumulator.
    Carry,
}

impl Overflow {
    /// Accumulator value after a fire.
    ///
    /// A non-positive interval always resets, otherwise `Carry` would let the
    /// accumulator grow without bound.
    #[must_use]
    pub fn apply(self, accumulated: f32, interval: f32) -> f32 {
        match self {
            Overflow::Carry if interval > 0.0 => accumulated - interval,
            _ => 0.0,
        }
    }
}

/// Static dispatch for the per-variant parts of the registry and sweep.
pub(crate) trait TickVariant {
    type Ticker: ?Sized + 'static;

    const VARIANT: Variant;

    fn list(ticks: &TickManager) -> &TickList<Self::Ticker>;

    fn list_mut(ticks: &mut TickManager) -> &mut TickList<Self::Ticker>;

    fn fire(ticker: &mut Self::Ticker, ctx: &mut TickContext<'_>);

    fn release(ticker: &mut Self::Ticker, ticks: &mut TickManager);
}

pub(crate) struct Scaled;

pub(crate) struct Unscaled;

pub(crate) struct Physics;

impl TickVariant for Scaled {
    type Ticker = dyn ScaledTick;

    const VARIANT: Variant = Variant::Scaled;

    fn list(ticks: &TickManager) -> &TickList<Self::Ticker> {
        &ticks.scaled
    }

    fn list_mut(ticks: &mut TickManager) -> &mut TickList<Self::Ticker> {
        &mut ticks.scaled
    }

    fn fire(ticker: &mut Self::Ticker, ctx: &mut TickContext<'_>) {
        ticker.tick(ctx);
    }

    fn release(ticker: &mut Self::Ticker, ticks: &mut TickManager) {
        ticker.remove_ticker(ticks);
    }
}

impl TickVariant for Unscaled {
    type Ticker = dyn UnscaledTick;

    const VARIANT: Variant = Variant::Unscaled;

    fn list(ticks: &TickManager) -> &TickList<Self::Ticker> {
        &ticks.unscaled
    }

    fn list_mut(ticks: &mut TickManager) -> &mut TickList<Self::Ticker> {
        &mut ticks.unscaled
    }

    fn fire(ticker: &mut Self::Ticker, ctx: &mut TickContext<'_>) {
        ticker.unscaled_tick(ctx);
    }

    fn release(ticker: &mut Self::Ticker, ticks: &mut TickManager) {
        ticker.remove_unscaled_ticker(ticks);
    }
}

impl TickVariant for Physics {
    type Ticker = dyn PhysicsTick;

    const VARIANT: Variant = Variant::Physics;

    fn list(ticks: &TickManager) -> &TickList<Self::Ticker> {
        &ticks.physics
    }

    fn list_mut(ticks: &mut TickManager) -> &mut TickList<Self::Ticker> {
        &mut ticks.physics
    }

    fn fire(ticker: &mut Self::Ticker, ctx: &mut TickContext<'_>) {
        ticker.physics_tick(ctx);
    }

    fn release(ticker: &mut Self::Ticker, ticks: &mut TickManager) {
        ticker.remove_physics_ticker(ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_carries_overshoot() {
        let next = Variant::Scaled.overflow().apply(1.25, 1.0);
        assert!((next - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_unscaled_and_physics_reset() {
        assert_eq!(Variant::Unscaled.overflow().apply(1.25, 1.0), 0.0);
        assert_eq!(Variant::Physics.overflow().apply(1.25, 1.0), 0.0);
    }

    #[test]
    fn test_carry_with_zero_interval_resets() {
        assert_eq!(Overflow::Carry.apply(0.016, 0.0), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Scaled.to_string(), "scaled");
        assert_eq!(Variant::Physics.to_string(), "physics");
    }
}

//! # cadence_tick
//!
//! Centralised tick dispatch. Instead of every object carrying its own
//! per-frame callback, objects register with a [`TickManager`] and the host
//! drives a single sweep per frame (scaled and unscaled tickers) and per
//! physics step (physics tickers).
//!
//! This crate provides:
//!
//! - [`ScaledTick`], [`UnscaledTick`], [`PhysicsTick`]: capability traits a
//!   ticker implements for each time source it wants.
//! - [`TickManager`]: the registry (add, remove, clear, freeze).
//! - [`TickRunner`]: the driver lifecycle (`Uninitialized → Active →
//!   Destroyed`) and the sweeps behind [`TickManager::update`] and
//!   [`TickManager::fixed_update`].
//! - [`Clock`], [`FrameTime`], [`TimeScale`]: per-frame elapsed time.
//! - [`ModifyTimeScale`]: an unscaled ticker that animates the time scale.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut ticks = TickManager::new(TickConfig::default());
//! let enemy = Rc::new(RefCell::new(Enemy::default()));
//! Enemy::add_ticker(&enemy, &mut ticks);
//!
//! let mut clock = Clock::new(0.02);
//! loop {
//!     ticks.start();
//!     ticks.fixed_update(clock.fixed_delta());
//!     ticks.update(clock.advance(1.0 / 60.0));
//! }
//! ```

pub mod clock;
pub mod config;
mod list;
pub mod manager;
pub mod runner;
pub mod ticker;
pub mod time_scale;
pub mod variant;

#[cfg(test)]
mod testing;

pub use clock::{Clock, FrameTime, TimeScale};
pub use config::TickConfig;
pub use list::TickStatus;
pub use manager::TickManager;
pub use runner::{RunnerState, TickRunner};
pub use ticker::{PhysicsTick, ScaledTick, TickContext, TickerKey, UnscaledTick};
pub use time_scale::ModifyTimeScale;
pub use variant::{Overflow, Variant};

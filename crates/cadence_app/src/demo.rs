//! Sample scene: a handful of tickers sharing one registry and one pool.
//!
//! - [`Turret`] turns on scaled time and fires sparks out of the pool.
//! - [`Drone`] moves on the physics step.
//! - [`Director`] triggers a slow-motion effect on real time.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use cadence_math::{Quat, Transform3D, Vec3};
use cadence_pool::{AutoReturn, PrefabId, SimplePool};
use cadence_tick::{
    ModifyTimeScale, PhysicsTick, ScaledTick, TickContext, TickManager, TimeScale, UnscaledTick,
    Variant,
};

/// Per-instance data of a pooled spark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spark {
    /// Times this instance has been fired.
    pub shots: u32,
}

#[derive(Debug)]
pub struct Turret {
    transform: Transform3D,
    /// Radians per scaled second.
    turn_rate: f32,
    pool: Rc<RefCell<SimplePool<Spark>>>,
    spark: PrefabId,
    spark_lifetime: f32,
    fired: u32,
}

impl Turret {
    #[must_use]
    pub fn new(pool: Rc<RefCell<SimplePool<Spark>>>, spark: PrefabId) -> Self {
        Self {
            transform: Transform3D::from_position(Vec3::new(0.0, 1.0, 0.0)),
            turn_rate: 1.5,
            pool,
            spark,
            spark_lifetime: 0.6,
            fired: 0,
        }
    }

    #[must_use]
    pub fn fired(&self) -> u32 {
        self.fired
    }

    #[must_use]
    pub fn transform(&self) -> &Transform3D {
        &self.transform
    }
}

impl ScaledTick for Turret {
    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.transform = self
            .transform
            .rotated(Quat::from_rotation_y(self.turn_rate * ctx.elapsed()));

        let muzzle = self.transform.position + self.transform.forward();
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            warn!("spark pool busy; skipping shot");
            return;
        };
        match pool.spawn_with(
            self.spark,
            muzzle,
            self.transform.rotation,
            AutoReturn::After(self.spark_lifetime),
        ) {
            Ok(id) => {
                if let Some(spark) = pool.get_mut(id) {
                    spark.value_mut().shots += 1;
                }
                self.fired += 1;
            }
            Err(err) => warn!(%err, "turret could not fire"),
        }
    }

    fn tick_duration(&self) -> f32 {
        0.25
    }
}

#[derive(Debug)]
pub struct Drone {
    transform: Transform3D,
    velocity: Vec3,
    steps: u32,
}

impl Drone {
    #[must_use]
    pub fn new(velocity: Vec3) -> Self {
        Self {
            transform: Transform3D::from_position(Vec3::ZERO),
            velocity,
            steps: 0,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

impl PhysicsTick for Drone {
    fn physics_tick(&mut self, ctx: &mut TickContext<'_>) {
        self.transform = self.transform.translated(self.velocity * ctx.elapsed());
        self.steps += 1;
    }

    /// Every physics step.
    fn physics_tick_duration(&self) -> f32 {
        0.0
    }
}

/// Every `period` real seconds, plays a slow-motion effect.
#[derive(Debug)]
pub struct Director {
    period: f32,
    effect: Rc<RefCell<ModifyTimeScale>>,
    triggered: u32,
}

impl Director {
    #[must_use]
    pub fn new(time_scale: TimeScale, period: f32) -> Self {
        let effect = ModifyTimeScale::new(time_scale, 0.2, 1.0, 0.5).with_curve(|t| t * t);
        Self {
            period,
            effect: Rc::new(RefCell::new(effect)),
            triggered: 0,
        }
    }

    #[must_use]
    pub fn triggered(&self) -> u32 {
        self.triggered
    }
}

impl UnscaledTick for Director {
    fn unscaled_tick(&mut self, ctx: &mut TickContext<'_>) {
        if ModifyTimeScale::add_unscaled_ticker(&self.effect, ctx.ticks()) {
            self.triggered += 1;
            debug!(triggered = self.triggered, "slow motion");
        }
    }

    fn unscaled_tick_duration(&self) -> f32 {
        self.period
    }
}

/// Owners of every ticker in the scene. Dropping it drops the tickers; the
/// registry prunes their entries on its next sweep.
#[derive(Debug)]
pub struct Scene {
    pub turret: Rc<RefCell<Turret>>,
    pub drone: Rc<RefCell<Drone>>,
    pub director: Rc<RefCell<Director>>,
}

impl Scene {
    /// Build the scene and register every ticker.
    pub fn spawn(
        ticks: &mut TickManager,
        pool: &Rc<RefCell<SimplePool<Spark>>>,
        time_scale: TimeScale,
    ) -> Self {
        let spark = pool.borrow_mut().register_prefab("spark", Spark::default);

        let turret = Rc::new(RefCell::new(Turret::new(Rc::clone(pool), spark)));
        let drone = Rc::new(RefCell::new(Drone::new(Vec3::new(0.0, 0.0, -2.0))));
        let director = Rc::new(RefCell::new(Director::new(time_scale, 3.0)));

        Turret::add_ticker(&turret, ticks);
        Drone::add_physics_ticker(&drone, ticks);
        Director::add_unscaled_ticker(&director, ticks);

        info!(
            scaled = ticks.len(Variant::Scaled),
            unscaled = ticks.len(Variant::Unscaled),
            physics = ticks.len(Variant::Physics),
            "scene spawned"
        );
        Self {
            turret,
            drone,
            director,
        }
    }

    pub fn report(&self) {
        let turret = self.turret.borrow();
        let drone = self.drone.borrow();
        info!(
            shots = turret.fired(),
            heading = ?turret.transform().forward(),
            drone_steps = drone.steps(),
            drone_position = ?drone.position(),
            slow_motions = self.director.borrow().triggered(),
            "scene report"
        );
    }
}

#[cfg(test)]
mod tests {
    use cadence_tick::{Clock, FrameTime};

    use super::*;

    fn scene() -> (TickManager, Rc<RefCell<SimplePool<Spark>>>, Clock, Scene) {
        let mut ticks = TickManager::default();
        let pool = Rc::new(RefCell::new(SimplePool::default()));
        let clock = Clock::new(0.02);
        let scene = Scene::spawn(&mut ticks, &pool, clock.time_scale().clone());
        (ticks, pool, clock, scene)
    }

    #[test]
    fn test_scene_registers_one_of_each() {
        let (ticks, _pool, _clock, _scene) = scene();
        assert_eq!(ticks.len(Variant::Scaled), 1);
        assert_eq!(ticks.len(Variant::Unscaled), 1);
        assert_eq!(ticks.len(Variant::Physics), 1);
    }

    #[test]
    fn test_turret_reuses_returned_sparks() {
        let (mut ticks, pool, _clock, scene) = scene();
        ticks.start();
        for _ in 0..100 {
            ticks.update(FrameTime::unscaled(0.05));
            pool.borrow_mut().update(0.05);
        }
        let fired = scene.turret.borrow().fired();
        assert!(fired >= 19);
        // 0.6 s lifetimes at one shot per 0.25 s keep at most three alive.
        assert!(pool.borrow().instance_count() <= 4);
    }

    #[test]
    fn test_drone_moves_per_physics_step() {
        let (mut ticks, _pool, _clock, scene) = scene();
        ticks.start();
        for _ in 0..50 {
            ticks.fixed_update(0.02);
        }
        let drone = scene.drone.borrow();
        assert_eq!(drone.steps(), 50);
        assert!((drone.position().z + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_director_slows_time_then_restores() {
        let (mut ticks, _pool, mut clock, scene) = scene();
        let scale = clock.time_scale().clone();
        ticks.start();

        // Just past the 3 s trigger.
        for _ in 0..32 {
            ticks.update(clock.advance(0.1));
        }
        assert_eq!(scene.director.borrow().triggered(), 1);
        assert!(scale.get() < 1.0);

        for _ in 0..10 {
            ticks.update(clock.advance(0.1));
        }
        assert_eq!(scale.get(), 1.0);
    }
}

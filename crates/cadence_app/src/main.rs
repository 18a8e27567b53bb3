//! # cadence_app: headless host
//!
//! Drives a [`TickManager`] and a [`SimplePool`] the way a game engine would:
//! a frame loop with a fixed physics step, a shared time scale and a clean
//! shutdown. Runs a small sample scene.
//!
//! ## Startup Sequence
//!
//! 1. Load the optional JSON config and apply command-line overrides.
//! 2. Build the registry, the pool and the sample scene.
//! 3. Run the frame loop until the frame limit, then shut down.

mod config;
mod demo;
mod host;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Result, ensure};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadence_pool::SimplePool;
use cadence_tick::TickManager;
use config::AppConfig;
use demo::Scene;
use host::Host;

#[derive(Parser)]
#[command(name = "cadence_app", about = "Run the tick registry and object pool sample scene")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames to run (0 = unlimited)
    #[arg(short, long)]
    frames: Option<u64>,

    /// Initial time scale
    #[arg(short, long)]
    time_scale: Option<f32>,

    /// Log every ticker visited by a sweep
    #[arg(short, long)]
    debug: bool,

    /// Hold the frame rate with real sleeps
    #[arg(short, long)]
    realtime: bool,
}

impl Args {
    fn into_config(self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(frames) = self.frames {
            config.looping.max_frames = frames;
        }
        if let Some(scale) = self.time_scale {
            config.looping.time_scale = scale;
        }
        config.tick.debug |= self.debug;
        config.looping.realtime |= self.realtime;

        ensure!(config.looping.frame_rate > 0.0, "frame_rate must be positive");
        ensure!(config.looping.time_scale >= 0.0, "time_scale must not be negative");
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cadence_app=info".parse()?))
        .init();

    let config = Args::parse().into_config()?;
    info!(?config, "cadence host starting");

    let ticks = TickManager::new(config.tick.clone());
    let pool = Rc::new(RefCell::new(SimplePool::new(config.pool.clone())));

    let mut host = Host::new(config.looping.clone(), ticks, Rc::clone(&pool));
    let time_scale = host.clock().time_scale().clone();
    let scene = Scene::spawn(host.ticks_mut(), &pool, time_scale);

    let summary = host.run();
    scene.report();
    info!(
        frames = summary.frames,
        fixed_steps = summary.fixed_steps,
        returned = summary.returned,
        instances = host.pool().borrow().instance_count(),
        runner = ?host.ticks().runner_state(),
        "cadence host shut down"
    );
    Ok(())
}

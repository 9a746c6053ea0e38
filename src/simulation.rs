use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::config::Config;
use crate::error::Result;
use crate::world::{Snapshot, World};

use crossbeam::channel::{self, select, Receiver, Sender};
use log::{debug, info, trace, warn};
use parking_lot::Mutex;

/// Runs a [`World`] on two timers, one per phase.
///
/// Both workers, and every caller of [`Simulation::with_world`], go through
/// the same mutex, so a phase always sees the collection whole and never
/// overlaps with the other phase or with a spawn.
pub struct Simulation {
    world: Arc<Mutex<World>>,
    frames: Receiver<Snapshot>,
    stop: Option<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
}

impl Simulation {
    /// Fails with the first invalid [`Config`] field; no thread is started then.
    pub fn start(world: World, config: &Config) -> Result<Self> {
        config.validate()?;
        let world = Arc::new(Mutex::new(world));
        let (stop_tx, stop_rx) = channel::bounded::<()>(0);
        let (frame_tx, frame_rx) = channel::bounded(config.frame_buffer);

        let forces = {
            let world = world.clone();
            let stop = stop_rx.clone();
            spawn_worker("forces", config.force_interval(), stop, move || {
                let merges = world.lock().tick_forces();
                if !merges.is_empty() {
                    trace!("{} coincident merges before resolving forces", merges.len());
                }
            })
        };

        let integrate = {
            let world = world.clone();
            spawn_worker("integrate", config.integrate_interval(), stop_rx, move || {
                let snapshot = {
                    let mut world = world.lock();
                    let merges = world.tick_integrate();
                    if !merges.is_empty() {
                        trace!("{} merges, {} bodies left", merges.len(), world.len());
                    }
                    world.snapshot()
                };
                // a full buffer means the consumer is behind; it gets the next frame
                let _ = frame_tx.try_send(snapshot);
            })
        };

        info!(
            "simulation started: forces every {:?}, integration every {:?}",
            config.force_interval(),
            config.integrate_interval()
        );

        Ok(Self {
            world,
            frames: frame_rx,
            stop: Some(stop_tx),
            workers: vec![forces, integrate],
        })
    }

    /// Snapshots published after each integration phase.
    pub fn frames(&self) -> &Receiver<Snapshot> {
        &self.frames
    }

    /// Runs `f` with exclusive access to the world, between phases.
    pub fn with_world<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut *self.world.lock())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.lock().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }

    /// Stops both timers and waits for any phase in flight to finish.
    pub fn stop(&mut self) {
        if self.stop.take().is_none() {
            return;
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("simulation worker panicked");
            }
        }
        info!("simulation stopped");
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_worker(
    name: &str,
    period: Duration,
    stop: Receiver<()>,
    mut phase: impl FnMut() + Send + 'static,
) -> JoinHandle<()> {
    let ticker = channel::tick(period);
    let name = name.to_string();
    thread::spawn(move || {
        debug!("{} worker running", name);
        loop {
            select! {
                recv(stop) -> _ => break,
                recv(ticker) -> _ => phase(),
            }
        }
        debug!("{} worker exiting", name);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Vector2;
    use crate::color::{self, Fixed};
    use crate::error::Error;
    use std::time::Instant;

    fn fast_config() -> Config {
        Config {
            force_interval_ms: 4,
            integrate_interval_ms: 1,
            ..Config::default()
        }
    }

    #[test]
    fn publishes_frames() {
        let config = fast_config();
        let mut world = World::with_color_source(&config, Fixed(color::neutral()));
        world.spawn(Vector2::new(0.0, 0.0), 2.0, None, None).unwrap();

        let mut sim = Simulation::start(world, &config).unwrap();
        let frame = sim.frames().recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(frame.len(), 1);
        sim.stop();
        assert!(!sim.is_running());
    }

    #[test]
    fn spawns_are_serialized_with_phases() {
        let config = fast_config();
        let world = World::with_color_source(&config, Fixed(color::neutral()));
        let mut sim = Simulation::start(world, &config).unwrap();

        for i in 0..20 {
            sim.with_world(|w| {
                w.spawn(Vector2::new(i as f64 * 1000.0, 0.0), 1.0, None, None)
                    .unwrap()
            });
        }
        thread::sleep(Duration::from_millis(20));
        sim.stop();

        let bodies = sim.snapshot();
        assert_eq!(bodies.len(), 20);
        assert!(bodies.iter().all(|b| b.pos.x.is_finite() && b.pos.y.is_finite()));
    }

    #[test]
    fn two_bodies_eventually_merge() {
        let config = fast_config();
        let mut world = World::with_color_source(&config, Fixed(color::neutral()));
        world.spawn(Vector2::new(0.0, 0.0), 10.0, None, None).unwrap();
        world.spawn(Vector2::new(60.0, 0.0), 10.0, None, None).unwrap();

        let sim = Simulation::start(world, &config).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while sim.snapshot().len() > 1 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        let bodies = sim.snapshot();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].radius, 12.5);
    }

    #[test]
    fn stop_is_idempotent() {
        let config = fast_config();
        let mut sim = Simulation::start(World::new(&config), &config).unwrap();
        sim.stop();
        sim.stop();
        assert!(sim.with_world(|w| w.is_empty()));
    }

    #[test]
    fn refuses_zero_intervals() {
        for config in [
            Config {
                force_interval_ms: 0,
                ..Config::default()
            },
            Config {
                integrate_interval_ms: 0,
                ..Config::default()
            },
            Config {
                frame_buffer: 0,
                ..Config::default()
            },
        ] {
            let result = Simulation::start(World::new(&config), &config);
            assert!(matches!(result, Err(Error::InvalidParameter { .. })));
        }
    }
}

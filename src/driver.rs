//! Real-time driver: runs the fast and slow cadences on worker threads.
//!
//! Both workers share one `Simulation` behind a single mutex and hold it for
//! the whole of each pass, so a slow-tick pass never observes a half-finished
//! collision pass and a geometry reset is never seen half-applied. Callers on
//! other threads go through the same lock.

use crate::simulation::{Simulation, SlowTickReport};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Owns the worker threads driving a shared simulation.
pub struct SimulationDriver {
    shared: Arc<Mutex<Simulation>>,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl SimulationDriver {
    /// Starts both cadences.
    pub fn start(sim: Simulation, tick_interval: Duration, slow_tick_interval: Duration) -> std::io::Result<Self> {
        Self::start_with_hook(sim, tick_interval, slow_tick_interval, |_: &mut Simulation, _: &SlowTickReport| {})
    }

    /// Starts both cadences; `on_slow_tick` runs inside every slow pass, under
    /// the same lock, right after the timer and sampler.
    pub fn start_with_hook<H>(
        sim: Simulation,
        tick_interval: Duration,
        slow_tick_interval: Duration,
        mut on_slow_tick: H,
    ) -> std::io::Result<Self>
    where
        H: FnMut(&mut Simulation, &SlowTickReport) + Send + 'static,
    {
        let shared = Arc::new(Mutex::new(sim));
        let stop = Arc::new(AtomicBool::new(false));
        let mut driver = SimulationDriver {
            shared: Arc::clone(&shared),
            stop: Arc::clone(&stop),
            workers: Vec::with_capacity(2),
        };

        driver.workers.push(spawn_cadence("sim-tick", tick_interval, &shared, &stop, |sim| {
            sim.tick();
        })?);
        driver.workers.push(spawn_cadence("sim-slow-tick", slow_tick_interval, &shared, &stop, move |sim| {
            let report = sim.slow_tick();
            on_slow_tick(sim, &report);
        })?);
        info!(
            "Driver started: fast tick every {:?}, slow tick every {:?}.",
            tick_interval, slow_tick_interval
        );
        Ok(driver)
    }

    /// Exclusive access to the simulation. A poisoned lock is recovered;
    /// resets happen inside a single call, so state between passes is whole.
    pub fn lock(&self) -> MutexGuard<'_, Simulation> {
        lock_simulation(&self.shared)
    }

    /// Runs `f` with exclusive access to the simulation.
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulation) -> T) -> T {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Stops and joins the workers. The simulation stays readable through
    /// [`SimulationDriver::lock`]. Idempotent.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.stop.store(true, Ordering::Release);
        for worker in &self.workers {
            worker.thread().unpark();
        }
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("worker").to_string();
            if worker.join().is_err() {
                log::error!("Worker '{}' panicked before shutdown.", name);
            }
        }
        debug!("Driver stopped.");
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock_simulation(shared: &Mutex<Simulation>) -> MutexGuard<'_, Simulation> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawns a thread running `pass` every `interval` until `stop` is set.
fn spawn_cadence<F>(
    name: &str,
    interval: Duration,
    shared: &Arc<Mutex<Simulation>>,
    stop: &Arc<AtomicBool>,
    mut pass: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnMut(&mut Simulation) + Send + 'static,
{
    let shared = Arc::clone(shared);
    let stop = Arc::clone(stop);
    thread::Builder::new().name(name.to_string()).spawn(move || {
        let mut next = Instant::now() + interval;
        while !stop.load(Ordering::Acquire) {
            {
                let mut sim = lock_simulation(&shared);
                pass(&mut sim);
            }
            // Sleep until the next deadline; shutdown unparks early.
            loop {
                if stop.load(Ordering::Acquire) {
                    return;
                }
                let now = Instant::now();
                if now >= next {
                    break;
                }
                thread::park_timeout(next - now);
            }
            next += interval;
            // Running behind: skip missed deadlines rather than bursting.
            let now = Instant::now();
            if next < now {
                next = now;
            }
        }
    })
}
